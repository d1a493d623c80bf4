use crate::models::score::{Grade, Score};

/// 单个学生的答题记录
///
/// 只由提取器生成，生成后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    /// 学号（唯一键，非空）
    pub identifier: String,
    /// 班级
    pub section: String,
    /// 答案文本
    pub answer: String,
}

impl StudentRecord {
    pub fn new(
        identifier: impl Into<String>,
        section: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            section: section.into(),
            answer: answer.into(),
        }
    }

    /// 班级是否匹配（忽略大小写）
    pub fn in_section(&self, section: &str) -> bool {
        self.section.to_lowercase() == section.to_lowercase()
    }
}

/// 学号 → 答题记录 的映射，按插入顺序遍历
///
/// 重复学号会原地覆盖旧记录（后写入者生效，位置保持第一次出现的位置）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    records: Vec<StudentRecord>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入记录，返回被覆盖的旧记录
    pub fn insert(&mut self, record: StudentRecord) -> Option<StudentRecord> {
        match self
            .records
            .iter_mut()
            .find(|r| r.identifier == record.identifier)
        {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StudentRecord> {
        self.records.iter()
    }
}

impl FromIterator<StudentRecord> for AnswerSheet {
    fn from_iter<I: IntoIterator<Item = StudentRecord>>(iter: I) -> Self {
        let mut sheet = AnswerSheet::new();
        for record in iter {
            sheet.insert(record);
        }
        sheet
    }
}

/// 单条评分结果，对应报告中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct GradeResult {
    pub identifier: String,
    pub section: String,
    pub answer: String,
    pub feedback: String,
    pub score: Score,
}

impl GradeResult {
    pub fn from_record(record: &StudentRecord, grade: Grade) -> Self {
        Self {
            identifier: record.identifier.clone(),
            section: record.section.clone(),
            answer: record.answer.clone(),
            feedback: grade.feedback,
            score: grade.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut sheet = AnswerSheet::new();
        assert!(sheet.insert(StudentRecord::new("101", "A", "first")).is_none());
        sheet.insert(StudentRecord::new("102", "A", "other"));
        let old = sheet.insert(StudentRecord::new("101", "B", "second"));

        assert_eq!(old.map(|r| r.answer), Some("first".to_string()));
        assert_eq!(sheet.len(), 2);
        let ids: Vec<&str> = sheet.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["101", "102"]);
        assert_eq!(sheet.get("101").map(|r| r.section.as_str()), Some("B"));
    }

    #[test]
    fn test_in_section_ignores_case() {
        let record = StudentRecord::new("7", "cs-A", "");
        assert!(record.in_section("CS-a"));
        assert!(!record.in_section("CS-B"));
    }
}
