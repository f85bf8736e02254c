use chrono::NaiveDate;
use image::{ImageBuffer, ImageFormat, Rgb};
use rirekisho::{ResumeRecord, parse_resume_json};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub fn render_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 10).unwrap_or_default()
}

/// A résumé document in the on-disk shape with the given list lengths.
pub fn resume_json(education: usize, work: usize, certifications: usize) -> Value {
    let education: Vec<Value> = (0..education)
        .map(|i| {
            json!({
                "date": format!("{}-04", 2010 + i),
                "type": if i % 2 == 0 { "入学" } else { "卒業" },
                "institution": format!("サンプル学園 第{}課程", i + 1)
            })
        })
        .collect();
    let work: Vec<Value> = (0..work)
        .map(|i| {
            json!({
                "date": format!("{}-{}", 2016 + i, 1 + i % 12),
                "type": if i % 2 == 0 { "入社" } else { "退職" },
                "company": format!("株式会社サンプル{}", i + 1)
            })
        })
        .collect();
    let certifications: Vec<Value> = (0..certifications)
        .map(|i| {
            json!({
                "date": format!("{} 6", 2015 + i),
                "name": format!("資格試験{}級 合格", i + 1)
            })
        })
        .collect();

    json!({
        "personal_info": {
            "name": { "kanji": "山田 花子", "furigana": "やまだ はなこ" },
            "birth_date": "1996-11-23",
            "gender": "女",
            "address": "〒150-0001 東京都渋谷区神宮前1-1-1",
            "phone": "080-0000-1111",
            "email": "hanako@example.jp"
        },
        "education": education,
        "work_experience": work,
        "certifications": certifications,
        "additional_info": {
            "skills": "データ分析、Python",
            "motivation": "志望の動機です。",
            "other": "貴社規定に従います。",
            "commute_time": "約30分",
            "family_dependents": 1,
            "spouse": true,
            "spouse_support": false
        }
    })
}

pub fn resume(education: usize, work: usize, certifications: usize) -> ResumeRecord {
    let source = resume_json(education, work, certifications).to_string();
    match parse_resume_json(&source) {
        Ok(record) => record,
        Err(e) => panic!("fixture should validate: {}", e),
    }
}

/// Writes a noisy 240x320 PNG portrait. Noise keeps the compressed size well
/// above the size of the placeholder drawing.
pub fn write_photo(dir: &Path) -> PathBuf {
    let mut state: u32 = 0x2545_F491;
    let img = ImageBuffer::from_fn(240, 320, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    let path = dir.join("photo.png");
    if let Err(e) = img.save_with_format(&path, ImageFormat::Png) {
        panic!("could not write fixture photo: {}", e);
    }
    path
}

/// Path to the sample document shipped with the crate.
fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn sample_data() -> PathBuf {
    data_dir().join("resume.json")
}

/// The YAML twin of [`sample_data`], which the CLI reads by default.
pub fn sample_yaml() -> PathBuf {
    data_dir().join("resume.yaml")
}
