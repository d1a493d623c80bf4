//! 页面渲染
//!
//! 模板内嵌在二进制中，只做占位符替换

const INDEX_TEMPLATE: &str = include_str!("index.html");

/// 结果区域
#[derive(Debug, Clone, Copy)]
pub struct ResultsView<'a> {
    /// 已渲染的结果表格（调用方负责转义单元格）
    pub table_html: &'a str,
    /// 是否显示下载链接
    pub downloadable: bool,
}

/// 渲染首页
///
/// # 参数
/// - `notices`: 提示信息（会转义）
/// - `results`: 评分结果区域
pub fn render_index(notices: &[String], results: Option<ResultsView<'_>>) -> String {
    let notices_html: String = notices
        .iter()
        .map(|notice| {
            format!(
                "<div class=\"notice\">{}</div>\n",
                html_escape::encode_text(notice)
            )
        })
        .collect();

    let results_html = match results {
        Some(view) if view.downloadable => format!(
            "<h2>Results</h2>\n<p><a href=\"/download\">Download CSV</a></p>\n{}",
            view.table_html
        ),
        Some(view) => format!("<h2>Results</h2>\n{}", view.table_html),
        None => String::new(),
    };

    fill_template(
        INDEX_TEMPLATE,
        &[
            ("{{NOTICES}}", notices_html.as_str()),
            ("{{RESULTS}}", results_html.as_str()),
        ],
    )
}

/// 单次扫描替换占位符
///
/// 替换进去的内容不会再被扫描，提示信息里出现的占位符文本原样保留
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = slots
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, *key, *value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, key, value)) => {
                output.push_str(&rest[..pos]);
                output.push_str(value);
                rest = &rest[pos + key.len()..];
            }
            None => {
                output.push_str(rest);
                return output;
            }
        }
    }
}

/// 构建带提示信息的首页地址
///
/// 多条提示用换行连接，渲染时再拆开
pub fn notice_url(notices: &[String]) -> String {
    if notices.is_empty() {
        return "/".to_string();
    }
    format!("/?notice={}", urlencoding::encode(&notices.join("\n")))
}

/// 拆分查询参数中的提示信息
pub fn split_notices(notice: Option<&str>) -> Vec<String> {
    notice
        .map(|n| {
            n.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
