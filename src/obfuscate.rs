//! Masking of API keys and service URLs in log output

use reqwest::Url;

/// Characters kept at each end of an API key
pub const KEY_SHOW: usize = 4;

/// Characters kept at each end of a hostname
pub const HOST_SHOW: usize = 3;

/// Digits of an explicit port that are always masked
const PORT_MASKED_DIGITS: usize = 3;

/// Keep the first and last `show` characters, mask the middle.
///
/// Strings of `2 * show` characters or fewer are masked entirely, and an
/// empty string renders as `***` so it is still visible in the log line.
pub fn obfuscate(s: &str, show: usize) -> String {
    let chars: Vec<char> = s.chars().collect();

    if chars.is_empty() {
        return "***".to_string();
    }

    if chars.len() <= show * 2 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..show].iter().collect();
    let tail: String = chars[chars.len() - show..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - show * 2), tail)
}

/// Render `url` with a partially masked host and port, keeping the path.
pub fn obfuscate_url(url: &str, show_host: usize) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return "***".to_string();
    };

    let host = parsed.host_str().unwrap_or("");
    // obfuscate() renders "" as "***", which would invent a host
    let masked_host = if host.is_empty() {
        String::new()
    } else {
        obfuscate(host, show_host)
    };

    let masked_port = match parsed.port() {
        Some(port) => {
            let digits = port.to_string();
            if digits.len() <= PORT_MASKED_DIGITS {
                format!(":{}", "*".repeat(digits.len()))
            } else {
                format!(":{}{}", "*".repeat(PORT_MASKED_DIGITS), &digits[PORT_MASKED_DIGITS..])
            }
        }
        None => String::new(),
    };

    format!(
        "{}://{}{}{}",
        parsed.scheme(),
        masked_host,
        masked_port,
        parsed.path()
    )
}

/// Decides how credentials appear in logs.
///
/// Built once from the configured verbosity and handed to the monitor.
/// Below debug everything is masked; at debug URLs and keys are shown as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redactor {
    reveal: bool,
}

impl Redactor {
    pub fn new(reveal: bool) -> Self {
        Self { reveal }
    }

    pub fn masked() -> Self {
        Self::new(false)
    }

    pub fn reveals(&self) -> bool {
        self.reveal
    }

    pub fn url(&self, url: &str) -> String {
        if self.reveal {
            url.to_string()
        } else {
            obfuscate_url(url, HOST_SHOW)
        }
    }

    pub fn key(&self, key: &str) -> String {
        if self.reveal {
            key.to_string()
        } else {
            obfuscate(key, KEY_SHOW)
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::masked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscate_long_key() {
        let key = "0123456789abcdef0123456789abcdef";
        let masked = obfuscate(key, 4);

        assert_eq!(masked.len(), key.len());
        assert!(masked.starts_with("0123"));
        assert!(masked.ends_with("cdef"));
        assert_eq!(&masked[4..28], "*".repeat(24));
    }

    #[test]
    fn test_obfuscate_short_key_fully_masked() {
        assert_eq!(obfuscate("abcdefgh", 4), "********");
        assert_eq!(obfuscate("abc", 4), "***");
        assert_eq!(obfuscate("", 4), "***");
        assert_eq!(obfuscate("abcdefghi", 4), "abcd*fghi");
    }

    #[test]
    fn test_obfuscate_url_masks_host_and_port() {
        assert_eq!(
            obfuscate_url("http://192.168.1.50:7878/api/v3/system/status", 3),
            "http://192******.50:***8/api/v3/system/status"
        );
        assert_eq!(
            obfuscate_url("https://radarr.example.com:443/api/v3/system/status", 3),
            "https://rad************com/api/v3/system/status"
        );
        assert_eq!(
            obfuscate_url("http://nas:989/radarr", 3),
            "http://***:***/radarr"
        );
    }

    #[test]
    fn test_obfuscate_url_without_host() {
        assert_eq!(obfuscate_url("file:///etc/hosts", 3), "file:///etc/hosts");
        assert_eq!(obfuscate_url("http://abcdef/", 3), "http://******/");
        assert_eq!(obfuscate_url("http://abcdefg/", 3), "http://abc*efg/");
    }

    #[test]
    fn test_obfuscate_url_unparseable() {
        assert_eq!(obfuscate_url("not a url", 3), "***");
        assert_eq!(obfuscate_url("", 3), "***");
    }

    #[test]
    fn test_redactor_reveal_at_debug() {
        let url = "http://10.0.0.12:8989/api/v3/system/status";
        let key = "supersecretapikey";

        let debug = Redactor::new(true);
        assert_eq!(debug.url(url), url);
        assert_eq!(debug.key(key), key);

        let info = Redactor::masked();
        assert!(!info.url(url).contains("10.0.0.12"));
        assert!(!info.key(key).contains("secret"));
        assert_eq!(info.key(key), "supe*********ikey");
    }
}
