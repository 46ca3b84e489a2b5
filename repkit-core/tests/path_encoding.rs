use repkit_core::pathenc::{check_path, encoding_for_codepage, PathCheck};
use std::path::Path;

#[test]
fn ascii_path_is_valid_under_cp1251() {
    let enc = encoding_for_codepage(1251).unwrap();
    assert_eq!(check_path(Path::new("D:/Games/SakuraNoUta"), enc), PathCheck::Valid);
}

#[test]
fn japanese_component_is_invalid_under_cp1251() {
    let enc = encoding_for_codepage(1251).unwrap();
    match check_path(Path::new("D:/サクラノ詩"), enc) {
        PathCheck::Invalid(components) => {
            assert_eq!(components, vec!["サクラノ詩".to_string()]);
        }
        PathCheck::Valid => panic!("expected an invalid component"),
    }
}

#[test]
fn japanese_component_is_valid_under_cp932() {
    let enc = encoding_for_codepage(932).unwrap();
    assert_eq!(check_path(Path::new("D:/サクラノ詩"), enc), PathCheck::Valid);
}

#[test]
fn cyrillic_depends_on_codepage() {
    let path = Path::new("D:/Игры/Стих Сакуры");
    let cp1251 = encoding_for_codepage(1251).unwrap();
    assert_eq!(check_path(path, cp1251), PathCheck::Valid);

    let cp1252 = encoding_for_codepage(1252).unwrap();
    match check_path(path, cp1252) {
        PathCheck::Invalid(components) => {
            // Whole segments are reported, in path order.
            assert_eq!(components, vec!["Игры".to_string(), "Стих Сакуры".to_string()]);
        }
        PathCheck::Valid => panic!("expected invalid components"),
    }
}

#[test]
fn mixed_path_reports_only_offending_segments() {
    let enc = encoding_for_codepage(1252).unwrap();
    match check_path(Path::new("C:/Games/ゲーム/bin"), enc) {
        PathCheck::Invalid(components) => assert_eq!(components, vec!["ゲーム".to_string()]),
        PathCheck::Valid => panic!("expected invalid component"),
    }
}

#[test]
fn codepage_table_covers_the_usual_suspects() {
    for cp in [874u32, 932, 936, 949, 950, 1250, 1251, 1252, 1253, 1254, 1255, 1256, 1257, 1258] {
        assert!(encoding_for_codepage(cp).is_some(), "codepage {cp}");
    }
    assert!(encoding_for_codepage(424242).is_none());
}
