// ── Localization ──
//
// Two compiled-in bundles: English and Simplified Chinese. Keys are the
// English source strings, so an English lookup falls back to the key
// itself. `{{name}}` placeholders are interpolated by `Translator::t_with`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    #[strum(to_string = "en", serialize = "en-US", serialize = "english")]
    En,
    #[serde(rename = "zh-CN")]
    #[strum(to_string = "zh-CN", serialize = "zh", serialize = "zh_CN", serialize = "zh-Hans")]
    ZhCn,
}

impl Language {
    /// The other bundle.
    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::ZhCn,
            Self::ZhCn => Self::En,
        }
    }

    /// Name of the language in itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::ZhCn => "简体中文",
        }
    }
}

/// String lookup for one language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let hit = match self.language {
            Language::En => en(key),
            Language::ZhCn => zh_cn(key),
        };
        hit.unwrap_or(key)
    }

    /// Translate, then replace each `{{name}}` with its value.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(self.t(key), args)
    }

    /// Display string for an upstream status code.
    pub fn status(&self, code: &str) -> String {
        self.t(code.trim()).to_owned()
    }

    pub fn table_locale(&self) -> &'static TableLocale {
        TableLocale::for_language(self.language)
    }
}

pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_owned();
    for (name, value) in args {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}

// ── Table chrome ─────────────────────────────────────────────────────

/// Localized strings for the table chrome: pagination, menus, hints.
#[derive(Debug, PartialEq, Eq)]
pub struct TableLocale {
    pub rows_per_page: &'static str,
    /// `{{from}}`, `{{to}}`, `{{count}}`.
    pub range_of: &'static str,
    /// `{{page}}`, `{{pages}}`.
    pub page_of: &'static str,
    pub no_records: &'static str,
    pub loading: &'static str,
    pub filter_by: &'static str,
    pub filter_mode: &'static str,
    pub clear_filter: &'static str,
    pub search: &'static str,
    pub sort_asc: &'static str,
    pub sort_desc: &'static str,
    pub unsorted: &'static str,
    pub actions: &'static str,
    pub go_to_next_page: &'static str,
    pub go_to_previous_page: &'static str,
}

pub const TABLE_LOCALE_EN: TableLocale = TableLocale {
    rows_per_page: "Rows per page",
    range_of: "{{from}}-{{to}} of {{count}}",
    page_of: "Page {{page}} of {{pages}}",
    no_records: "No records to display",
    loading: "Loading",
    filter_by: "Filter by {{column}}",
    filter_mode: "Filter mode",
    clear_filter: "Clear filter",
    search: "Search",
    sort_asc: "Sorted ascending",
    sort_desc: "Sorted descending",
    unsorted: "Unsorted",
    actions: "Actions",
    go_to_next_page: "Go to next page",
    go_to_previous_page: "Go to previous page",
};

pub const TABLE_LOCALE_ZH_CN: TableLocale = TableLocale {
    rows_per_page: "每页行数",
    range_of: "{{from}}-{{to}}，共 {{count}}",
    page_of: "第 {{page}} 页，共 {{pages}} 页",
    no_records: "无记录",
    loading: "加载中",
    filter_by: "按 {{column}} 过滤",
    filter_mode: "过滤模式",
    clear_filter: "清除过滤",
    search: "搜索",
    sort_asc: "升序排列",
    sort_desc: "降序排列",
    unsorted: "未排序",
    actions: "操作",
    go_to_next_page: "下一页",
    go_to_previous_page: "上一页",
};

impl TableLocale {
    pub fn for_language(language: Language) -> &'static Self {
        match language {
            Language::En => &TABLE_LOCALE_EN,
            Language::ZhCn => &TABLE_LOCALE_ZH_CN,
        }
    }
}

// ── Bundles ──────────────────────────────────────────────────────────

/// English overrides for keys that aren't display text themselves.
fn en(key: &str) -> Option<&'static str> {
    Some(match key {
        "normal" => "Normal",
        "abnormal" => "Abnormal",
        "failed" => "Failed",
        "unknown" => "Unknown",
        _ => return None,
    })
}

fn zh_cn(key: &str) -> Option<&'static str> {
    Some(match key {
        // Columns
        "ID" => "ID",
        "Client IP" => "客户端 IP",
        "Mac Address" => "MAC 地址",
        "Host Name" => "主机名",
        "Last Query Time" => "最后查询时间",
        "Host" => "主机",
        "IP" => "IP",
        "Port" => "端口",
        "Type" => "类型",
        "Status" => "状态",
        "Success Rate" => "成功率",
        "Avg Time" => "平均时间",
        "Total Query Count" => "总查询次数",
        "Total Success Number" => "总成功次数",
        // Views and actions
        "Clients" => "客户端",
        "Upstream Servers" => "上游服务器",
        "Refresh Data" => "刷新数据",
        "Delete" => "删除",
        "Mac Vendor" => "MAC 厂商",
        "Equals" => "等于",
        "Contains" => "包含",
        "Language" => "语言",
        "Theme" => "主题",
        // Key hints
        "select" => "选择",
        "column" => "列",
        "filter" => "过滤",
        "mode" => "模式",
        "page" => "翻页",
        "size" => "每页",
        "sort" => "排序",
        "search" => "搜索",
        "clear" => "清除",
        "apply" => "应用",
        "cancel" => "取消",
        "done" => "完成",
        "help" => "帮助",
        "quit" => "退出",
        // Help overlay
        "Keyboard Shortcuts" => "快捷键",
        "Global" => "全局",
        "Switch screen" => "切换页面",
        "Toggle language" => "切换语言",
        "Toggle theme" => "切换主题",
        "Refresh screen / all screens" => "刷新当前 / 全部页面",
        "Close this help" => "关闭帮助",
        "Quit" => "退出",
        "Select row" => "选择行",
        "Select filter column" => "选择过滤列",
        "Edit column filter" => "编辑列过滤",
        "Cycle filter mode" => "切换过滤模式",
        "Clear filter / all filters" => "清除过滤 / 全部过滤",
        "First / last page" => "首页 / 末页",
        "Delete client / Mac vendor" => "删除客户端 / MAC 厂商",
        "Pick column / cycle sort" => "选择列 / 切换排序",
        "Search / clear search" => "搜索 / 清除搜索",
        // Notifications and banners
        "Error" => "错误",
        "Error loading data" => "加载数据出错",
        "No data returned." => "未返回数据。",
        "Not implemented yet." => "尚未实现。",
        "Delete client {{id}} {{client_ip}} successfully." => {
            "删除客户端 {{id}} {{client_ip}} 成功。"
        }
        "Logged in again after session expiry." => "会话过期后已重新登录。",
        // Error codes
        "Session expired, please log in again." => "会话已过期，请重新登录。",
        "Login failed." => "登录失败。",
        "Permission denied." => "权限不足。",
        "Resource not found." => "资源不存在。",
        "Invalid parameter." => "参数无效。",
        "Server error." => "服务器错误。",
        "Network error." => "网络错误。",
        "Request timed out." => "请求超时。",
        "Invalid response from server." => "服务器响应无效。",
        "Unknown error." => "未知错误。",
        // Upstream status codes
        "normal" => "正常",
        "abnormal" => "异常",
        "failed" => "失败",
        "unknown" => "未知",
        _ => return None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        assert_eq!("zh-CN".parse::<Language>().unwrap(), Language::ZhCn);
        assert_eq!("ZH".parse::<Language>().unwrap(), Language::ZhCn);
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!(Language::ZhCn.to_string(), "zh-CN");
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn english_falls_back_to_key() {
        let tr = Translator::new(Language::En);
        assert_eq!(tr.t("Client IP"), "Client IP");
        assert_eq!(tr.status("normal"), "Normal");
        assert_eq!(tr.status("weird"), "weird");
    }

    #[test]
    fn chinese_bundle_and_interpolation() {
        let tr = Translator::new(Language::ZhCn);
        assert_eq!(tr.t("Refresh Data"), "刷新数据");
        assert_eq!(
            tr.t_with(
                "Delete client {{id}} {{client_ip}} successfully.",
                &[("id", "5"), ("client_ip", "10.0.0.5")]
            ),
            "删除客户端 5 10.0.0.5 成功。"
        );
    }

    #[test]
    fn table_locale_switches_with_language() {
        assert_eq!(
            Translator::new(Language::En).table_locale().rows_per_page,
            "Rows per page"
        );
        assert_eq!(
            Translator::new(Language::ZhCn).table_locale().rows_per_page,
            "每页行数"
        );
        assert_eq!(
            interpolate(TABLE_LOCALE_EN.page_of, &[("page", "1"), ("pages", "4")]),
            "Page 1 of 4"
        );
    }
}
