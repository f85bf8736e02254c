//! Reads résumé documents and validates them into a [`ResumeRecord`].
//!
//! Documents are JSON or YAML with the same field names. The on-disk shape
//! groups the name under `personal_info.name` and names the timeline arrays
//! `education` and `work_experience`. Validation collects every problem
//! before failing so a user can fix a document in one pass.

use crate::error::{FieldProblem, PipelineError, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use rirekisho_layout::format::parse_birth_date;
use rirekisho_types::record::{AdditionalInfo, PersonalInfo, ResumeRecord, TimelineEntry};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

pub const EDUCATION_TYPES: [&str; 3] = ["入学", "卒業", "中途退学"];
pub const WORK_TYPES: [&str; 5] = ["入社", "退職", "在職中", "転籍", "異動"];

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .expect("email pattern is valid")
});

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$")
        .expect("date pattern is valid")
});

#[derive(Debug, Deserialize)]
struct ResumeDocument {
    personal_info: PersonalInfoDocument,
    #[serde(default)]
    education: Vec<EducationDocument>,
    #[serde(default)]
    work_experience: Vec<WorkDocument>,
    #[serde(default)]
    certifications: Vec<CertificationDocument>,
    #[serde(default)]
    additional_info: AdditionalInfoDocument,
}

#[derive(Debug, Deserialize)]
struct NameDocument {
    #[serde(default)]
    kanji: String,
    #[serde(default)]
    furigana: String,
}

#[derive(Debug, Deserialize)]
struct PersonalInfoDocument {
    name: NameDocument,
    #[serde(default)]
    birth_date: String,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    address: String,
    #[serde(default)]
    address_furigana: Option<String>,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    landline: Option<String>,
    #[serde(default)]
    fax: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EducationDocument {
    date: String,
    #[serde(rename = "type")]
    kind: String,
    institution: String,
}

#[derive(Debug, Deserialize)]
struct WorkDocument {
    date: String,
    #[serde(rename = "type")]
    kind: String,
    company: String,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CertificationDocument {
    date: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct AdditionalInfoDocument {
    #[serde(default)]
    skills: String,
    #[serde(default)]
    motivation: String,
    #[serde(default)]
    other: String,
    #[serde(default)]
    commute_time: Option<String>,
    #[serde(default)]
    family_dependents: Option<u32>,
    #[serde(default)]
    spouse: Option<bool>,
    #[serde(default)]
    spouse_support: Option<bool>,
}

/// Reads and validates a résumé file.
///
/// Files ending in `.yaml` or `.yml` are read as YAML, anything else as JSON.
pub fn load_resume_file<P: AsRef<Path>>(path: P) -> Result<ResumeRecord, PipelineError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| {
        PipelineError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read résumé from '{}': {}", path.display(), e),
        ))
    })?;
    log::debug!(
        "Loaded {} bytes of résumé data from {}",
        source.len(),
        path.display()
    );
    if is_yaml(path) {
        parse_resume_yaml(&source)
    } else {
        parse_resume_json(&source)
    }
}

fn is_yaml(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
}

/// Parses and validates a JSON résumé document.
pub fn parse_resume_json(source: &str) -> Result<ResumeRecord, PipelineError> {
    let document: ResumeDocument = serde_json::from_str(source)?;
    finish(document)
}

/// Parses and validates a YAML résumé document.
pub fn parse_resume_yaml(source: &str) -> Result<ResumeRecord, PipelineError> {
    let document: ResumeDocument = serde_yaml::from_str(source)?;
    finish(document)
}

fn finish(document: ResumeDocument) -> Result<ResumeRecord, PipelineError> {
    let record = validate(document)?;
    log::info!(
        "Validated résumé for {}: {} education, {} work, {} certification entries",
        record.personal.name_kanji,
        record.education.len(),
        record.work.len(),
        record.certifications.len()
    );
    Ok(record)
}

#[derive(Default)]
struct Problems(Vec<FieldProblem>);

impl Problems {
    fn check(&mut self, ok: bool, path: impl Into<String>, message: &str) {
        if !ok {
            self.0.push(FieldProblem {
                path: path.into(),
                message: message.to_string(),
            });
        }
    }
}

fn validate(document: ResumeDocument) -> Result<ResumeRecord, ValidationError> {
    let mut problems = Problems::default();
    let p = &document.personal_info;

    problems.check(
        !p.name.kanji.trim().is_empty(),
        "personal_info.name.kanji",
        "氏名は必須です",
    );
    problems.check(
        !p.name.furigana.trim().is_empty(),
        "personal_info.name.furigana",
        "ふりがなは必須です",
    );
    problems.check(
        ISO_DATE.is_match(&p.birth_date) && parse_birth_date(&p.birth_date).is_ok(),
        "personal_info.birth_date",
        "生年月日はYYYY-MM-DD形式で入力してください",
    );
    problems.check(
        !p.address.trim().is_empty(),
        "personal_info.address",
        "住所は必須です",
    );
    problems.check(
        !p.phone.trim().is_empty(),
        "personal_info.phone",
        "電話番号は必須です",
    );
    problems.check(
        EMAIL.is_match(&p.email),
        "personal_info.email",
        "正しいメールアドレスを入力してください",
    );

    for (i, entry) in document.education.iter().enumerate() {
        problems.check(
            EDUCATION_TYPES.contains(&entry.kind.as_str()),
            format!("education.{}.type", i),
            "種別は入学・卒業・中途退学のいずれかです",
        );
    }
    for (i, entry) in document.work_experience.iter().enumerate() {
        problems.check(
            WORK_TYPES.contains(&entry.kind.as_str()),
            format!("work_experience.{}.type", i),
            "種別は入社・退職・在職中・転籍・異動のいずれかです",
        );
    }
    for (i, entry) in document.certifications.iter().enumerate() {
        problems.check(
            !entry.name.trim().is_empty(),
            format!("certifications.{}.name", i),
            "資格名は必須です",
        );
    }

    if !problems.0.is_empty() {
        return Err(ValidationError {
            problems: problems.0,
        });
    }

    Ok(into_record(document))
}

fn into_record(document: ResumeDocument) -> ResumeRecord {
    let p = document.personal_info;
    let personal = PersonalInfo {
        name_kanji: p.name.kanji,
        name_furigana: p.name.furigana,
        birth_date: p.birth_date,
        gender: p.gender.filter(|g| !g.trim().is_empty()),
        address: p.address,
        address_furigana: p.address_furigana,
        phone: p.phone,
        email: p.email,
        landline: p.landline,
        fax: p.fax,
    };

    let education = document
        .education
        .into_iter()
        .map(|e| TimelineEntry::new(e.date.as_str(), e.kind, e.institution))
        .collect();

    let work = document
        .work_experience
        .into_iter()
        .map(|w| {
            let description = match w.detail.as_deref().map(str::trim) {
                Some(detail) if !detail.is_empty() => format!("{}　{}", w.company, detail),
                _ => w.company,
            };
            TimelineEntry::new(w.date.as_str(), w.kind, description)
        })
        .collect();

    let certifications = document
        .certifications
        .into_iter()
        .map(|c| TimelineEntry::new(c.date.as_str(), "", c.name))
        .collect();

    let a = document.additional_info;
    let additional = AdditionalInfo {
        skills: a.skills,
        motivation: a.motivation,
        request: a.other,
        commute_time: a.commute_time,
        dependents: a.family_dependents,
        spouse: a.spouse,
        spouse_support: a.spouse_support,
    };

    ResumeRecord {
        personal,
        education,
        work,
        certifications,
        additional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "personal_info": {
            "name": { "kanji": "山田 太郎", "furigana": "やまだ たろう" },
            "birth_date": "1995-06-04",
            "gender": "男",
            "address": "〒166-0003 東京都杉並区高円寺南1-2-3",
            "phone": "090-1234-5678",
            "email": "taro@example.com"
        },
        "education": [
            { "date": "2014-04", "type": "入学", "institution": "東京大学 工学部" },
            { "date": "2018-03", "type": "卒業", "institution": "東京大学 工学部" }
        ],
        "work_experience": [
            {
                "date": "2018-04",
                "type": "入社",
                "company": "株式会社サンプル",
                "detail": "開発部配属"
            },
            { "date": "現在", "type": "在職中", "company": "株式会社サンプル" }
        ],
        "certifications": [
            { "date": "2017-06", "name": "基本情報技術者" }
        ],
        "additional_info": {
            "skills": "Rust",
            "other": "貴社規定に従います",
            "family_dependents": 0,
            "spouse": false
        }
    }"#;

    #[test]
    fn test_valid_document_maps_onto_record() {
        let record = parse_resume_json(VALID).unwrap();
        assert_eq!(record.personal.name_kanji, "山田 太郎");
        assert_eq!(record.personal.gender.as_deref(), Some("男"));
        assert_eq!(record.education.len(), 2);
        assert_eq!(record.education[0].category, "入学");
        assert_eq!(record.work[0].description, "株式会社サンプル　開発部配属");
        assert_eq!(record.work[1].date.as_str(), "現在");
        assert_eq!(record.certifications[0].description, "基本情報技術者");
        assert_eq!(record.additional.request, "貴社規定に従います");
        assert_eq!(record.additional.dependents, Some(0));
    }

    #[test]
    fn test_every_invalid_field_is_reported() {
        let source = VALID
            .replace("山田 太郎", "")
            .replace("taro@example.com", "taro@example")
            .replace("1995-06-04", "1995-6-4")
            .replace("\"入社\"", "\"昇進\"");
        let err = match parse_resume_json(&source) {
            Err(PipelineError::Validation(err)) => err,
            other => panic!("expected validation error, got {:?}", other),
        };
        assert_eq!(err.problems.len(), 4);
        assert!(err.has_problem_at("personal_info.name.kanji"));
        assert!(err.has_problem_at("personal_info.email"));
        assert!(err.has_problem_at("personal_info.birth_date"));
        assert!(err.has_problem_at("work_experience.0.type"));
    }

    #[test]
    fn test_impossible_birth_date_is_rejected() {
        let source = VALID.replace("1995-06-04", "1995-02-30");
        match parse_resume_json(&source) {
            Err(PipelineError::Validation(err)) => {
                assert!(err.has_problem_at("personal_info.birth_date"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_a_json_error() {
        assert!(matches!(parse_resume_json("{"), Err(PipelineError::Json(_))));
    }

    const VALID_YAML: &str = r#"
personal_info:
  name:
    kanji: 山田 太郎
    furigana: やまだ たろう
  birth_date: "1995-06-04"
  address: 〒166-0003 東京都杉並区高円寺南1-2-3
  phone: 090-1234-5678
  email: taro@example.com
education:
  - { date: "2014-04", type: 入学, institution: 東京大学 工学部 }
work_experience:
  - date: "2018-04"
    type: 入社
    company: 株式会社サンプル
    detail: 開発部配属
  - { date: 現在, type: 在職中, company: 株式会社サンプル }
additional_info:
  other: 貴社規定に従います
  family_dependents: 0
"#;

    #[test]
    fn test_yaml_document_maps_like_json() {
        let record = parse_resume_yaml(VALID_YAML).unwrap();
        assert_eq!(record.personal.name_kanji, "山田 太郎");
        assert_eq!(record.personal.phone, "090-1234-5678");
        assert_eq!(record.education[0].date.as_str(), "2014-04");
        assert_eq!(record.work[0].description, "株式会社サンプル　開発部配属");
        assert_eq!(record.work[1].date.as_str(), "現在");
        assert_eq!(record.additional.request, "貴社規定に従います");
        assert_eq!(record.additional.dependents, Some(0));
    }

    #[test]
    fn test_yaml_validation_uses_the_same_paths() {
        let source = VALID_YAML.replace("type: 入社", "type: 昇進");
        match parse_resume_yaml(&source) {
            Err(PipelineError::Validation(err)) => {
                assert_eq!(err.problems.len(), 1);
                assert!(err.has_problem_at("work_experience.0.type"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        let malformed = parse_resume_yaml("personal_info: [");
        assert!(matches!(malformed, Err(PipelineError::Yaml(_))));
    }

    #[test]
    fn test_extension_picks_the_parser() {
        assert!(is_yaml(Path::new("data/resume.yaml")));
        assert!(is_yaml(Path::new("resume.YML")));
        assert!(!is_yaml(Path::new("resume.json")));
        assert!(!is_yaml(Path::new("resume")));
    }

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL.is_match("a@b.jp"));
        assert!(!EMAIL.is_match("a b@c.jp"));
        assert!(!EMAIL.is_match("@c.jp"));
        assert!(!EMAIL.is_match("a@cjp"));
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = load_resume_file("/nonexistent/resume.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/resume.json"));
    }
}
