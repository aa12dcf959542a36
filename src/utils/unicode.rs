//! 文件名的 Unicode 清理
//!
//! 上传前移除不可见字符与双向文本控制字符，并把路径分隔符替换掉，
//! 保证发送给预签名接口的只是一个普通文件名。

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200D}' // 零宽空格 / 连接符
            | '\u{FEFF}'
            | '\u{00AD}'
            | '\u{2060}'..='\u{2064}'
            | '\u{202A}'..='\u{202E}' // 双向文本控制
            | '\u{2066}'..='\u{2069}'
    ) || c.is_control()
}

/// 清理上传文件名，结果为空时返回 `file`
pub fn sanitize_file_name(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !is_invisible(*c))
        .map(|c| match c {
            '/' | '\\' | '／' | '＼' => '_',
            '．' => '.',
            '：' | ':' => '_',
            _ => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_invisible() {
        assert_eq!(sanitize_file_name("a\u{200B}b.png"), "ab.png");
        assert_eq!(sanitize_file_name("\u{202E}gnp.exe"), "gnp.exe");
        assert_eq!(sanitize_file_name("rain\u{2066}.mp3\u{2069}"), "rain.mp3");
    }

    #[test]
    fn test_replaces_separators() {
        assert_eq!(sanitize_file_name("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_file_name("课文／第一课．mp3"), "课文_第一课.mp3");
        assert_eq!(sanitize_file_name("C:\\a.png"), "C__a.png");
    }

    #[test]
    fn test_keeps_normal_names() {
        assert_eq!(sanitize_file_name("下雨了.mp3"), "下雨了.mp3");
        assert_eq!(sanitize_file_name("  "), "file");
    }
}
