//! Logic lõi dựng mô hình pipeline: bản ghi, cấu hình và chú giải màu.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trần số bản ghi đưa vào một lần render để chặn cây DOM phình to.
pub const MAX_RENDERED_RECORDS: usize = 250;

/// Bảng màu cố định, gán theo vị trí cho từng category trong chú giải.
pub const CATEGORY_PALETTE: [&str; 15] = [
    "#2563eb", "#dc6803", "#067647", "#b42318", "#6941c6", "#0e7090", "#c11574", "#3e4784",
    "#b54708", "#175cd3", "#4f7a21", "#9f1ab1", "#e04f16", "#0b5394", "#475467",
];

/// Màu trung tính cho bản ghi có category nằm ngoài chú giải.
pub const FALLBACK_COLOR: &str = "#94a3b8";

/// Chiều cao (px) dải header/footer khi được bật.
pub const BAND_HEIGHT: f64 = 96.0;

/// Phần trừ cố định khi tính chiều cao vùng công ty: thanh phase 56px
/// cộng khoảng đệm lưới.
pub const COMPANIES_FIXED_OFFSET: f64 = 72.0;

/// Vị trí dải ảnh kèm theo biểu đồ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutBand {
    None,
    Header,
    Footer,
}

impl Default for LayoutBand {
    fn default() -> Self {
        Self::None
    }
}

impl LayoutBand {
    /// Đọc giá trị host đã lưu; chuỗi lạ rơi về `None` thay vì báo lỗi.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "header" => Self::Header,
            "footer" => Self::Footer,
            _ => Self::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }
}

/// Cấu hình người dùng do host sở hữu, đọc lại nguyên vẹn mỗi lần update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineSettings {
    pub title: String,
    /// Danh sách phase theo thứ tự hiển thị, phân tách bằng dấu phẩy.
    pub phases: String,
    /// Danh sách category ưu tiên; để trống thì suy ra từ dữ liệu.
    pub categories: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub layout: LayoutBand,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            title: "Pipeline".to_string(),
            phases: String::new(),
            categories: String::new(),
            image_url: String::new(),
            layout: LayoutBand::None,
        }
    }
}

impl PipelineSettings {
    /// Tên object chứa các thuộc tính trong khung property của host.
    pub const OBJECT_NAME: &'static str = "pipeline";

    pub fn phase_labels(&self) -> Vec<String> {
        split_csv(&self.phases)
    }

    pub fn category_labels(&self) -> Vec<String> {
        split_csv(&self.categories)
    }

    /// Liệt kê giá trị hiện tại của các thuộc tính chỉnh được cho khung
    /// property; object lạ trả danh sách rỗng.
    pub fn enumerate_properties(&self, object_name: &str) -> Vec<SettingsProperty> {
        if object_name != Self::OBJECT_NAME {
            return Vec::new();
        }

        let entry = |property: &str, value: String| SettingsProperty {
            object: Self::OBJECT_NAME.to_string(),
            property: property.to_string(),
            value,
        };

        vec![
            entry("title", self.title.clone()),
            entry("phases", self.phases.clone()),
            entry("categories", self.categories.clone()),
            entry("imageUrl", self.image_url.clone()),
            entry("layout", self.layout.as_str().to_string()),
        ]
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Một thuộc tính hiển thị trong khung chỉnh sửa của host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsProperty {
    pub object: String,
    pub property: String,
    pub value: String,
}

/// Một dòng dữ liệu đã làm phẳng từ dataset của host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineRecord {
    pub title: Option<String>,
    pub phase: Option<String>,
    pub category: Option<String>,
    pub name: Option<String>,
}

impl Default for PipelineRecord {
    fn default() -> Self {
        Self {
            title: None,
            phase: None,
            category: None,
            name: None,
        }
    }
}

/// Kích thước khung nhìn host cấp cho mỗi lần update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Chiều rộng CSS cho gốc nội dung; khung nhìn vắng mặt thì phủ kín host.
pub fn content_width_css(viewport: Viewport) -> String {
    if viewport.width > 0.0 {
        format!("{}px", viewport.width)
    } else {
        "100%".to_string()
    }
}

/// Chiều cao CSS cho gốc nội dung, chừa chỗ cho dải ảnh đang bật.
pub fn content_height_css(viewport: Viewport, layout: LayoutBand) -> String {
    let reserve = if layout == LayoutBand::None {
        0.0
    } else {
        BAND_HEIGHT
    };

    if viewport.height > 0.0 {
        format!("{}px", (viewport.height - reserve).max(0.0))
    } else if reserve > 0.0 {
        format!("calc(100% - {reserve}px)")
    } else {
        "100%".to_string()
    }
}

/// Chiều cao CSS cho vùng công ty sau khi đo chiều cao chú giải, để lưới
/// cuộn không đè lên chú giải.
pub fn companies_height_css(legend_height: f64) -> String {
    format!("calc(100% - {}px)", legend_height + COMPANIES_FIXED_OFFSET)
}

/// Một cặp category và màu hiển thị trong chú giải.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryColor {
    pub category: String,
    pub color: String,
}

/// Dựng chú giải: ưu tiên danh sách đã cấu hình; nếu trống thì lấy các
/// category có mặt trong bản ghi theo thứ tự chữ cái. Quá 15 mục thì màu
/// quay vòng theo vị trí.
pub fn derive_legend(configured: &[String], records: &[PipelineRecord]) -> Vec<CategoryColor> {
    let categories: Vec<String> = if configured.is_empty() {
        let mut distinct: Vec<String> = records
            .iter()
            .filter_map(|record| record.category.clone())
            .collect();
        distinct.sort();
        distinct.dedup();
        distinct
    } else {
        configured.to_vec()
    };

    categories
        .into_iter()
        .enumerate()
        .map(|(index, category)| CategoryColor {
            category,
            color: CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()].to_string(),
        })
        .collect()
}

/// Tra màu của một category; khớp mục đầu tiên, thiếu thì trả màu trung tính.
pub fn color_for<'a>(legend: &'a [CategoryColor], category: Option<&str>) -> &'a str {
    category
        .and_then(|needle| legend.iter().find(|entry| entry.category == needle))
        .map(|entry| entry.color.as_str())
        .unwrap_or(FALLBACK_COLOR)
}

/// Một cột phase cùng các bản ghi khớp nhãn của nó.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseColumn {
    pub label: String,
    pub records: Vec<PipelineRecord>,
}

/// Mô hình sẵn sàng render, dựng lại từ đầu cho mỗi lần update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineSnapshot {
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub phases: Vec<PhaseColumn>,
    pub legend: Vec<CategoryColor>,
    pub total_records: usize,
    pub truncated: bool,
}

impl PipelineSnapshot {
    /// Dựng snapshot từ cấu hình và các bản ghi đã chuyển đổi. Bản ghi giữ
    /// nguyên thứ tự nguồn, cắt ở [`MAX_RENDERED_RECORDS`] trước khi gom cột.
    pub fn build(settings: &PipelineSettings, mut records: Vec<PipelineRecord>) -> Self {
        let total_records = records.len();
        let truncated = total_records > MAX_RENDERED_RECORDS;
        records.truncate(MAX_RENDERED_RECORDS);

        let legend = derive_legend(&settings.category_labels(), &records);

        let phases = settings
            .phase_labels()
            .into_iter()
            .map(|label| {
                let matching = records
                    .iter()
                    .filter(|record| record.phase.as_deref() == Some(label.as_str()))
                    .cloned()
                    .collect();
                PhaseColumn {
                    label,
                    records: matching,
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            title: settings.title.clone(),
            phases,
            legend,
            total_records,
            truncated,
        }
    }

    /// Tổng số bản ghi thực sự nằm trong các cột phase.
    pub fn placed_records(&self) -> usize {
        self.phases.iter().map(|column| column.records.len()).sum()
    }
}

/// Lỗi chung khi xử lý payload từ host.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Lỗi khác: {0}")]
    Other(String),
}
