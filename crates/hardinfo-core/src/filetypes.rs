//! File type tables used by save dialogs

/// A savable file type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileType<T> {
    /// Name shown to the user
    pub name: &'static str,

    /// MIME type
    pub mime_type: &'static str,

    /// Extension including the leading dot
    pub extension: &'static str,

    /// Payload associated with this type (e.g. a report format)
    pub data: T,
}

/// Find the type whose extension ends `filename`
pub fn find_by_filename<'a, T>(types: &'a [FileType<T>], filename: &str) -> Option<&'a FileType<T>> {
    types.iter().find(|ty| filename.ends_with(ty.extension))
}

/// Find the type with the given display name
pub fn find_by_name<'a, T>(types: &'a [FileType<T>], name: &str) -> Option<&'a FileType<T>> {
    types.iter().find(|ty| ty.name == name)
}

/// Append `extension` to `filename` unless it already ends with it
pub fn with_extension(filename: &str, extension: &str) -> String {
    if filename.ends_with(extension) {
        filename.to_string()
    } else {
        format!("{filename}{extension}")
    }
}
