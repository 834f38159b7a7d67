//! Document identity normalization.
//!
//! Corpus documents are addressed inconsistently across services: the search
//! index returns `filename` values that may carry a directory prefix and a
//! `_page_<n>` locator suffix, while the page store keys rows by a file path
//! containing the bare document name. Comparing or looking up documents
//! therefore goes through one normalized base identity: last path segment,
//! locator suffix removed, percent-encoding decoded.

const PAGE_LOCATOR: &str = "_page_";

/// Last path segment of a document reference (handles `/` and `\` separators).
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Strip any `_page_<n>` locator suffix from a document reference.
pub fn strip_page_locator(name: &str) -> &str {
    match name.split_once(PAGE_LOCATOR) {
        Some((base, _)) => base,
        None => name,
    }
}

/// Normalized base identity of a document reference.
pub fn base_identity(path: &str) -> String {
    let name = strip_page_locator(file_name(path));
    match urlencoding::decode(name) {
        Ok(decoded) => decoded.into_owned(),
        // Malformed percent-encoding: compare the raw form instead.
        Err(_) => name.to_string(),
    }
}

/// Whether two document references resolve to the same document.
pub fn same_document(a: &str, b: &str) -> bool {
    base_identity(a) == base_identity(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(file_name("corpus/eba/EBA-GL-2017-06.pdf"), "EBA-GL-2017-06.pdf");
        assert_eq!(file_name(r"corpus\eba\EBA-GL-2017-06.pdf"), "EBA-GL-2017-06.pdf");
        assert_eq!(file_name("EBA-GL-2017-06.pdf"), "EBA-GL-2017-06.pdf");
    }

    #[test]
    fn test_strip_page_locator() {
        assert_eq!(strip_page_locator("FIVA-4-2018.di_page_207"), "FIVA-4-2018.di");
        assert_eq!(strip_page_locator("FIVA-4-2018.di"), "FIVA-4-2018.di");
    }

    #[test]
    fn test_base_identity_decodes_percent_encoding() {
        assert_eq!(
            base_identity("docs/Final%20Guidelines.di_page_12"),
            "Final Guidelines.di"
        );
    }

    #[test]
    fn test_same_document_across_pages_and_paths() {
        assert!(same_document(
            "corpus/EBA-GL-2017-06.di_page_44",
            "EBA-GL-2017-06.di_page_207"
        ));
        assert!(!same_document("EBA-GL-2017-06.di", "EBA-GL-2020-06.di"));
    }

    #[test]
    fn test_malformed_encoding_falls_back_to_raw() {
        assert_eq!(base_identity("bad%zz.di"), "bad%zz.di");
    }
}
