/// PDF 文本提取
///
/// 基于 lopdf 逐页提取文本：
/// - 整个文档无法打开时返回错误
/// - 单页提取失败时静默跳过，继续处理后续页面
use lopdf::Document;
use std::fmt::Display;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 从 PDF 字节中提取所有页面的文本
///
/// # 参数
/// - `pdf_bytes`: PDF 文件内容
///
/// # 返回
/// 返回按页顺序拼接的文本，每个非空页面后追加一个换行
pub fn extract_text_from_pdf(pdf_bytes: &[u8]) -> AppResult<String> {
    let document = Document::load_mem(pdf_bytes).map_err(AppError::unreadable_pdf)?;
    let pages = document.get_pages();
    debug!("PDF 共 {} 页", pages.len());

    let text = join_page_texts(
        pages
            .keys()
            .map(|&page_number| (page_number, document.extract_text(&[page_number]))),
    );

    debug!("PDF 文本提取完成，共 {} 字符", text.chars().count());
    Ok(text)
}

/// 拼接逐页提取结果
///
/// 失败的页面和空页面都会被跳过
pub fn join_page_texts<E: Display>(
    pages: impl IntoIterator<Item = (u32, Result<String, E>)>,
) -> String {
    let mut text = String::new();
    for (page_number, page) in pages {
        match page {
            Ok(page_text) if !page_text.is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(_) => debug!("第 {} 页没有文本", page_number),
            Err(e) => debug!("第 {} 页文本提取失败，跳过: {}", page_number, e),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// 生成一个每页一行文字的 PDF
    fn build_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("save pdf");
        bytes
    }

    #[test]
    fn test_join_page_texts_skips_failed_and_empty_pages() {
        let pages: Vec<(u32, Result<String, String>)> = vec![
            (1, Ok("RegNo: 1".to_string())),
            (2, Err("bad font".to_string())),
            (3, Ok(String::new())),
            (4, Ok("Section: A".to_string())),
        ];
        assert_eq!(join_page_texts(pages), "RegNo: 1\nSection: A\n");
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let result = extract_text_from_pdf(b"definitely not a pdf");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_extracts_text_from_every_page() {
        let bytes = build_pdf(&["RegNo: 101 Section: A", "Answer: TCP is reliable"]);
        let text = extract_text_from_pdf(&bytes).expect("extract");
        assert!(text.contains("RegNo"));
        assert!(text.contains("TCP is reliable"));
    }
}
