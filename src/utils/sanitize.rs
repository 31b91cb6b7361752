//! 文件名净化
//!
//! 纯函数、全函数：任何输入都返回可用的文件名，绝不失败。

/// 文件名最大长度（字符数）
const MAX_FILENAME_LEN: usize = 150;

/// 净化后为空时的兜底文件名
const EMPTY_FALLBACK: &str = "sans_titre";

/// 净化字符串使其可以安全地用作文件名
///
/// 规则：
/// - 路径分隔符和其他破坏文件名的字符（`/ \ | : *`）替换为 `_`
/// - `? " < > #` 直接删除
/// - `&` 替换为 `et`
/// - 控制字符（含换行）替换为空格
/// - 去除首尾空白，截断到 150 个字符
/// - 结果为空时返回兜底名称
///
/// 幂等：`sanitize_filename(sanitize_filename(s)) == sanitize_filename(s)`。
pub fn sanitize_filename(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '/' | '\\' | '|' | ':' | '*' => cleaned.push('_'),
            '?' | '"' | '<' | '>' | '#' => {}
            '&' => cleaned.push_str("et"),
            c if c.is_control() => cleaned.push(' '),
            c => cleaned.push(c),
        }
    }
    let truncated: String = cleaned.trim().chars().take(MAX_FILENAME_LEN).collect();
    let result = truncated.trim().to_string();
    if result.is_empty() {
        EMPTY_FALLBACK.to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_path_breaking_chars() {
        assert_eq!(sanitize_filename("a/b\\c|d:e*f"), "a_b_c_d_e_f");
    }

    #[test]
    fn test_removes_forbidden_chars() {
        assert_eq!(sanitize_filename("a?b\"c<d>e#f"), "abcdef");
    }

    #[test]
    fn test_ampersand_becomes_et() {
        assert_eq!(sanitize_filename("chat & chien"), "chat et chien");
    }

    #[test]
    fn test_control_chars_become_spaces() {
        assert_eq!(sanitize_filename("ligne1\nligne2\rfin"), "ligne1 ligne2 fin");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize_filename("  titre  "), "titre");
    }

    #[test]
    fn test_truncates_to_max_len() {
        let long = "x".repeat(400);
        assert_eq!(sanitize_filename(&long).chars().count(), MAX_FILENAME_LEN);
    }

    #[test]
    fn test_empty_input_gets_fallback() {
        assert_eq!(sanitize_filename(""), EMPTY_FALLBACK);
        assert_eq!(sanitize_filename("   \n\r  "), EMPTY_FALLBACK);
        assert_eq!(sanitize_filename("?\"<>#"), EMPTY_FALLBACK);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "vidéo / drôle : été & hiver?",
            "  \t entête\n",
            "",
            "normal",
            &"é".repeat(200),
        ];
        for input in inputs {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once, "幂等性被破坏: {:?}", input);
        }
    }

    #[test]
    fn test_output_never_contains_forbidden_chars() {
        let nasty = "a/b\\c|d:e?f*g\"h<i>j#k&l\nm";
        let out = sanitize_filename(nasty);
        for forbidden in ['/', '\\', '|', ':', '?', '*', '"', '<', '>'] {
            assert!(!out.contains(forbidden), "输出中残留非法字符 {:?}", forbidden);
        }
    }
}
