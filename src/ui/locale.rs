//! Localized strings for the terminal front end.
//!
//! The extraction core never formats user-facing text; everything a person
//! reads is looked up here by the presentation layer, using the language
//! chosen once at startup.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Spanish
    Es,
    /// Chinese (Simplified)
    Zh,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Es, Language::Zh]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Zh => "zh",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Zh => "Chinese (Simplified)",
        }
    }
}

/// One language's worth of message strings.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub language: Language,
    pub welcome: &'static str,
    pub enter_archive_path: &'static str,
    pub extracting: &'static str,
    pub progress: &'static str,
    pub time_elapsed: &'static str,
    pub done: &'static str,
    pub total_extracted: &'static str,
    pub extracted_files: &'static str,
    pub archive_missing: &'static str,
    pub not_recognized: &'static str,
    pub error: &'static str,
    pub cancelled: &'static str,
    pub press_enter: &'static str,
}

const ENGLISH: Catalog = Catalog {
    language: Language::En,
    welcome: "Welcome to RSB Extract",
    enter_archive_path: "Enter the path to the IPA file: ",
    extracting: "Extracting RSB files...",
    progress: "Progress",
    time_elapsed: "Time elapsed",
    done: "Extraction complete!",
    total_extracted: "Total files extracted:",
    extracted_files: "Extracted files:",
    archive_missing: "The IPA file was not found. Check the path and try again.",
    not_recognized: "No RSB files were found in this archive.",
    error: "An error occurred",
    cancelled: "Extraction cancelled.",
    press_enter: "Press Enter to exit...",
};

const SPANISH: Catalog = Catalog {
    language: Language::Es,
    welcome: "Bienvenido a RSB Extract",
    enter_archive_path: "Introduce la ruta del archivo IPA: ",
    extracting: "Extrayendo archivos RSB...",
    progress: "Progreso",
    time_elapsed: "Tiempo transcurrido",
    done: "¡Extracción completada!",
    total_extracted: "Total de archivos extraídos:",
    extracted_files: "Archivos extraídos:",
    archive_missing: "No se encontró el archivo IPA. Revisa la ruta e inténtalo de nuevo.",
    not_recognized: "No se encontraron archivos RSB en este archivo.",
    error: "Se produjo un error",
    cancelled: "Extracción cancelada.",
    press_enter: "Presiona Enter para salir...",
};

const CHINESE: Catalog = Catalog {
    language: Language::Zh,
    welcome: "欢迎使用 RSB Extract",
    enter_archive_path: "请输入 IPA 文件路径: ",
    extracting: "正在提取 RSB 文件...",
    progress: "进度",
    time_elapsed: "已用时间",
    done: "提取完成！",
    total_extracted: "提取文件总数:",
    extracted_files: "已提取的文件:",
    archive_missing: "未找到 IPA 文件，请检查路径后重试。",
    not_recognized: "此归档中未找到 RSB 文件。",
    error: "发生错误",
    cancelled: "提取已取消。",
    press_enter: "按回车键退出...",
};

impl Catalog {
    pub fn for_language(language: Language) -> &'static Catalog {
        match language {
            Language::En => &ENGLISH,
            Language::Es => &SPANISH,
            Language::Zh => &CHINESE,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        ENGLISH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for language in Language::all() {
            assert_eq!(Language::from_code(language.code()), Some(*language));
        }
        assert_eq!(Language::from_code(" ZH "), Some(Language::Zh));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_catalog_selection() {
        assert_eq!(Catalog::for_language(Language::Es).progress, "Progreso");
        assert_eq!(Catalog::for_language(Language::Zh).language, Language::Zh);
        assert_eq!(Catalog::default().language, Language::En);
    }

    #[test]
    fn test_catalogs_are_complete() {
        for language in Language::all() {
            let catalog = Catalog::for_language(*language);
            let strings = [
                catalog.welcome,
                catalog.enter_archive_path,
                catalog.extracting,
                catalog.progress,
                catalog.time_elapsed,
                catalog.done,
                catalog.total_extracted,
                catalog.extracted_files,
                catalog.archive_missing,
                catalog.not_recognized,
                catalog.error,
                catalog.cancelled,
                catalog.press_enter,
            ];
            assert!(strings.iter().all(|s| !s.is_empty()), "{:?}", language);
        }
    }
}
