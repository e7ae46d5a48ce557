//! 文字種の判定
//!
//! Unicode の一般カテゴリで判定する。数字は Nd、英字は L* のみで、
//! ローマ数字のような Nl は英字にも数字にも含めない。

use unicode_general_category::{get_general_category, GeneralCategory};

/// 10進数字（一般カテゴリ Nd）か
pub fn is_decimal_digit(ch: char) -> bool {
    get_general_category(ch) == GeneralCategory::DecimalNumber
}

/// 英字（一般カテゴリ Lu, Ll, Lt, Lm, Lo）か
pub fn is_letter(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// 10進数字の値
///
/// Nd の文字は 0 から 9 まで連続した並びで割り当てられているので、
/// 連続する Nd の先頭からの距離で値が決まる。
pub fn digit_value(ch: char) -> Option<u32> {
    if let Some(d) = ch.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(ch) {
        return None;
    }

    let code = ch as u32;
    let mut zero = code;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        zero -= 1;
    }
    Some((code - zero) % 10)
}
