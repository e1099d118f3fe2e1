/// Literal the remote prompt variant asks the model to return when the text
/// needs no correction. The local variant asks for an empty reply instead;
/// both framings normalize to the empty string.
pub const NO_CHANGES_SENTINEL: &str = "NO_CHANGES";

const RULES: &str = r#"あなたは日本語のゲーム翻訳・校正の専門家です。以下のテキストについて、誤字脱字、文法ミス、半角文字の使用を修正してください。ただし、以下のルールを厳密に守ってください。

【重要な指示】
1. 誤りがある場合は、修正後の文章のみを返し、説明や補足は不要です。
2. 原文のスタイルや語調はそのまま維持してください。
3. 内容を追加・削除せず、誤りのある部分だけを修正してください。
4. 以下の形式で記述されたタグ（およびその中の内容）は絶対に変更しないでください：
- %...% の形式（例：%map,Bangor,Location_Pub%）
- <...> の形式（例：<color=red>、<fontvar=-1>など）
- {...} の形式（例：{アイテム名}など）
- $...$ の形式（例：$map,Dunbarton,Location_TownOffice$）
5. タグの**外にある半角英字・半角カタカナ**は、**全角に変換**してください。
※ただし、**数字（0-9）は半角のままで構いません**。
※タグの開始記号から終了記号までの範囲内の文字列は、全角・半角を含めて一切変更禁止です。"#;

const REMOTE_NO_CHANGE_RULE: &str =
    r#"6. 誤りがない場合は "NO_CHANGES" とだけ返してください。"#;

const LOCAL_NO_CHANGE_RULE: &str = r#"6. 誤りがない場合は、何も返さず、出力を完全に省略してください。（"NO_CHANGES" なども含めず、空の文字列を返してください。）"#;

/// Prompt for the remote variant: no-change replies use the literal
/// sentinel. The divergence from the local variant is deliberate and both
/// framings are kept as documented.
pub fn remote_prompt(text: &str) -> String {
    format!("{RULES}\n{REMOTE_NO_CHANGE_RULE}\n\n修正対象のテキスト:{text}\n\n返答:")
}

/// Prompt for the local variant: no-change replies are empty.
pub fn local_prompt(text: &str) -> String {
    format!("{RULES}\n{LOCAL_NO_CHANGE_RULE}\n\n修正対象のテキスト:{text}\n\n返答:")
}

/// Collapses both "no correction needed" framings (the explicit sentinel or
/// an empty body) into the empty string the merger expects.
pub fn normalize_reply(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_CHANGES_SENTINEL {
        String::new()
    } else {
        trimmed.to_string()
    }
}
