use encoding_rs::Encoding;
use std::path::Path;

/// Outcome of a path encodability test. A non-encodable component is the
/// expected signal here, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathCheck {
    Valid,
    Invalid(Vec<String>),
}

/// Map a numeric Windows codepage onto its encoding table. Unknown codepages
/// yield None and are reported by the caller.
pub fn encoding_for_codepage(cp: u32) -> Option<&'static Encoding> {
    let label = match cp {
        874 => "windows-874".to_string(),
        932 => "shift_jis".to_string(),
        936 => "gbk".to_string(),
        949 => "euc-kr".to_string(),
        950 => "big5".to_string(),
        20866 => "koi8-r".to_string(),
        1250..=1258 => format!("windows-{cp}"),
        65001 => "utf-8".to_string(),
        _ => return None,
    };
    Encoding::for_label(label.as_bytes())
}

/// Test each path component independently against the target codepage.
/// Components containing at least one unrepresentable character are collected
/// in order; the result names whole segments, not individual characters.
/// Pure function over the path string; the filesystem is never touched.
pub fn check_path(path: &Path, encoding: &'static Encoding) -> PathCheck {
    let mut invalid = Vec::new();
    for comp in path.components() {
        let text = comp.as_os_str().to_string_lossy();
        if !encodable(&text, encoding) {
            invalid.push(text.into_owned());
        }
    }
    if invalid.is_empty() {
        PathCheck::Valid
    } else {
        PathCheck::Invalid(invalid)
    }
}

fn encodable(text: &str, encoding: &'static Encoding) -> bool {
    let (_, _, had_errors) = encoding.encode(text);
    !had_errors
}
