//! Disallowed-content policy applied to book source display names.
//!
//! A name is disallowed when it equals an entry of [`EXACT_MATCHES`], or when it
//! contains a [`KEYWORDS`] entry that is not excused by one of the
//! [`EXCEPTIONS`]. An exception is a `(keyword, allowed_context)` pair: the
//! keyword is ignored for a name that also contains the longer, benign context
//! (for example `色` inside `色彩`).
//!
//! Keywords are matched as plain case-sensitive substrings.

/// Substrings that mark a name as disallowed.
pub const KEYWORDS: &[&str] = &[
    // explicit age markers
    "18", "PO18", "Woo18", "成人", "18禁",
    // erotic vocabulary
    "色", "情", "欲", "淫", "艳", "春", "宫", "房", "床",
    "激情", "诱惑", "魅惑", "撩人", "风骚", "妖娆", "勾魂", "销魂",
    "荡", "浪", "媚", "骚", "辣文", "肉色", "色欲", "污",
    // adult services
    "小姐", "鸡", "妓", "嫖", "娼",
    // innuendo
    "操", "干", "插", "射", "爽", "舔", "吸", "摸", "抚", "揉", "搓",
    "挺", "硬", "湿", "紧", "粉嫩", "鲍",
    "黄", "黄色", "污漫", "肉漫",
    "腐小说", "腐文", "耽美",
];

/// Names removed verbatim, whether or not they trip a keyword.
pub const EXACT_MATCHES: &[&str] = &[
    "18mh",
    "PO18文学", "PO18site", "PO18完本", "po18分站",
    "欲望社", "每日色漫", "红尘黄色", "色文网吧",
    "66成人小说", "Woo18小说", "中文成人文学",
    "丽图·污漫画", "优质粉嫩鲍", "淫淫小说可以漫画",
    "肉色漫画", "色欲文", "欲书台",
];

/// `(keyword, allowed_context)` pairs checked before a keyword excludes a name.
pub const EXCEPTIONS: &[(&str, &str)] = &[
    ("色", "色彩"),
    ("色", "特色"),
    ("色", "本色"),
    ("情", "情节"),
    ("情", "剧情"),
    ("情", "情怀"),
    ("春", "春秋"),
    ("春", "青春"),
    ("房", "书房"),
    ("房", "房间"),
    ("小姐", "小姐姐"),
];

/// Classifier over display names. The default instance uses the built-in tables.
#[derive(Debug, Clone, Copy)]
pub struct ContentPolicy {
    keywords: &'static [&'static str],
    exact_matches: &'static [&'static str],
    exceptions: &'static [(&'static str, &'static str)],
}

impl Default for ContentPolicy {
    fn default() -> Self {
        ContentPolicy::new(KEYWORDS, EXACT_MATCHES, EXCEPTIONS)
    }
}

impl ContentPolicy {
    pub const fn new(
        keywords: &'static [&'static str],
        exact_matches: &'static [&'static str],
        exceptions: &'static [(&'static str, &'static str)],
    ) -> Self {
        ContentPolicy {
            keywords,
            exact_matches,
            exceptions,
        }
    }

    /// `true` when the name must be removed from the collection.
    pub fn is_disallowed(&self, name: &str) -> bool {
        if self.exact_matches.iter().any(|m| *m == name) {
            return true;
        }
        self.keywords
            .iter()
            .any(|keyword| name.contains(keyword) && !self.is_excused(keyword, name))
    }

    fn is_excused(&self, keyword: &str, name: &str) -> bool {
        self.exceptions
            .iter()
            .any(|(k, context)| *k == keyword && name.contains(context))
    }
}
