/// Half-width to full-width conversion for text outside tag spans.
///
/// Converts half-width Latin letters to their full-width forms and
/// half-width katakana (including dakuten/handakuten combining marks) to
/// full-width katakana. Digits 0-9 stay half-width, everything else passes
/// through unchanged.
pub fn to_fullwidth(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_alphabetic() {
            // U+0041..U+005A / U+0061..U+007A map directly into the
            // full-width block at a fixed offset.
            out.push(char::from_u32(c as u32 + 0xFEE0).unwrap_or(c));
            continue;
        }

        match halfwidth_kana(c) {
            Some(base) => {
                let composed = match chars.peek() {
                    Some('\u{FF9E}') => voiced(base),
                    Some('\u{FF9F}') => semi_voiced(base),
                    _ => None,
                };
                match composed {
                    Some(k) => {
                        chars.next();
                        out.push(k);
                    }
                    None => out.push(base),
                }
            }
            None => out.push(c),
        }
    }

    out
}

/// Maps one code point of the half-width katakana block (U+FF61..U+FF9F) to
/// its full-width form, punctuation and sound marks included.
fn halfwidth_kana(c: char) -> Option<char> {
    const TABLE: [char; 63] = [
        '。', '「', '」', '、', '・', 'ヲ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ', 'ャ', 'ュ', 'ョ', 'ッ',
        'ー', 'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス', 'セ',
        'ソ', 'タ', 'チ', 'ツ', 'テ', 'ト', 'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ', 'ヒ', 'フ', 'ヘ',
        'ホ', 'マ', 'ミ', 'ム', 'メ', 'モ', 'ヤ', 'ユ', 'ヨ', 'ラ', 'リ', 'ル', 'レ', 'ロ', 'ワ',
        'ン', '゛', '゜',
    ];
    let cp = c as u32;
    if (0xFF61..=0xFF9F).contains(&cp) {
        Some(TABLE[(cp - 0xFF61) as usize])
    } else {
        None
    }
}

/// Full-width katakana composed with a dakuten, if the combination exists.
fn voiced(base: char) -> Option<char> {
    match base {
        'ウ' => Some('ヴ'),
        'カ' | 'キ' | 'ク' | 'ケ' | 'コ' | 'サ' | 'シ' | 'ス' | 'セ' | 'ソ' | 'タ' | 'チ'
        | 'ツ' | 'テ' | 'ト' | 'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => {
            char::from_u32(base as u32 + 1)
        }
        _ => None,
    }
}

/// Full-width katakana composed with a handakuten (ハ row only).
fn semi_voiced(base: char) -> Option<char> {
    match base {
        'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(base as u32 + 2),
        _ => None,
    }
}
