use std::fmt;

/// 分数，范围固定在 [1, 10]
///
/// 启发式评分总是整数；LLM 解析出的分数保留小数精度
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(f64);

impl Score {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 10.0;

    /// 创建分数，超出范围的值会被截断到 [1, 10]
    ///
    /// NaN 视为最低分
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// 是否为整数分
    pub fn is_whole(self) -> bool {
        self.0.fract() == 0.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// 评分结果（分数 + 反馈）
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub score: Score,
    pub feedback: String,
}

impl Grade {
    pub fn new(score: Score, feedback: impl Into<String>) -> Self {
        Self {
            score,
            feedback: feedback.into(),
        }
    }
}
