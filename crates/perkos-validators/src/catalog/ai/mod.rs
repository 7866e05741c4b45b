//! Request rule sets for AI feature endpoints
//!
//! Vision, audio, text processing, content generation, code tooling and
//! education. Every rule set here is independent of the others.
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

pub mod types;

pub use types::*;

use super::{Catalog, RuleSet};
use crate::validation::{EnumRule, NumberRule, ObjectRule, Rule, TextRule};

fn required_text(message: &str) -> TextRule {
    TextRule::new().non_empty(message)
}

fn length() -> EnumRule {
    EnumRule::new(["short", "medium", "long"])
}

// Vision & image

rule_set! {
    pub fn image_analyze => "image-analyze", Catalog::Ai,
    ObjectRule::new()
        .required("image", required_text("Image URL is required"))
        .optional("question", TextRule::new())
        .optional("maxTokens", NumberRule::integer().positive())
}

rule_set! {
    pub fn image_generate => "image-generate", Catalog::Ai,
    ObjectRule::new()
        .required("prompt", required_text("Prompt is required"))
        .defaulted("size", EnumRule::new(["1024x1024", "1792x1024", "1024x1792"]), "1024x1024")
        .defaulted("quality", EnumRule::new(["standard", "hd"]), "standard")
        .defaulted("style", EnumRule::new(["vivid", "natural"]), "vivid")
        .defaulted("n", NumberRule::integer().min(1.0).max(10.0), 1)
}

rule_set! {
    pub fn ocr_extract => "ocr-extract", Catalog::Ai,
    ObjectRule::new()
        .required("image", required_text("Image URL is required"))
        .optional("language", TextRule::new())
}

// Audio

rule_set! {
    pub fn text_synthesize => "text-synthesize", Catalog::Ai,
    ObjectRule::new()
        .required(
            "text",
            required_text("Text is required").max_length(4096, "Text too long"),
        )
        .defaulted(
            "voice",
            EnumRule::new(["alloy", "echo", "fable", "onyx", "nova", "shimmer"]),
            "alloy",
        )
        .defaulted("speed", NumberRule::decimal().min(0.25).max(4.0), 1.0)
}

rule_set! {
    pub fn audio_transcribe => "audio-transcribe", Catalog::Ai,
    ObjectRule::new()
        .required("audio", required_text("Audio URL is required"))
        .optional("language", TextRule::new())
        .optional("prompt", TextRule::new())
}

// Text processing

rule_set! {
    pub fn text_summarize => "text-summarize", Catalog::Ai,
    ObjectRule::new()
        .required("text", required_text("Text is required"))
        .defaulted("length", length(), "medium")
        .defaulted("format", EnumRule::new(["paragraph", "bullets"]), "paragraph")
}

rule_set! {
    pub fn text_translate => "text-translate", Catalog::Ai,
    ObjectRule::new()
        .required("text", required_text("Text is required"))
        .required("sourceLang", TextRule::new().min_length(2, "Source language is required"))
        .required("targetLang", TextRule::new().min_length(2, "Target language is required"))
        .optional("formality", EnumRule::new(["formal", "informal", "neutral"]))
}

rule_set! {
    pub fn sentiment_analyze => "sentiment-analyze", Catalog::Ai,
    ObjectRule::new()
        .required("text", required_text("Text is required"))
        .defaulted("detailed", Rule::boolean(), false)
}

rule_set! {
    pub fn content_moderate => "content-moderate", Catalog::Ai,
    ObjectRule::new()
        .required("content", required_text("Content is required"))
        .optional("categories", Rule::list(TextRule::new()))
}

rule_set! {
    pub fn text_simplify => "text-simplify", Catalog::Ai,
    ObjectRule::new()
        .required("text", required_text("Text is required"))
        .defaulted(
            "targetLevel",
            EnumRule::new(["elementary", "middle", "high", "college"]),
            "middle",
        )
}

rule_set! {
    pub fn entity_extract => "entity-extract", Catalog::Ai,
    ObjectRule::new()
        .required("text", required_text("Text is required"))
        .optional(
            "types",
            Rule::list(EnumRule::new([
                "person",
                "organization",
                "location",
                "date",
                "money",
                "product",
            ])),
        )
}

// Content generation

rule_set! {
    pub fn email_generate => "email-generate", Catalog::Ai,
    ObjectRule::new()
        .required("context", required_text("Context is required"))
        .defaulted(
            "tone",
            EnumRule::new(["professional", "friendly", "formal", "casual"]),
            "professional",
        )
        .defaulted("length", length(), "medium")
}

rule_set! {
    pub fn product_description => "product-description", Catalog::Ai,
    ObjectRule::new()
        .required("product", required_text("Product name/description is required"))
        .optional("features", Rule::list(TextRule::new()))
        .optional("audience", TextRule::new())
        .defaulted(
            "tone",
            EnumRule::new(["professional", "casual", "luxury", "technical"]),
            "professional",
        )
}

rule_set! {
    pub fn seo_optimize => "seo-optimize", Catalog::Ai,
    ObjectRule::new()
        .required("content", required_text("Content is required"))
        .optional("keywords", Rule::list(TextRule::new()))
        .optional("targetUrl", TextRule::new().url())
}

// Code & technical

rule_set! {
    pub fn code_generate => "code-generate", Catalog::Ai,
    ObjectRule::new()
        .required("prompt", required_text("Prompt is required"))
        .required("language", required_text("Programming language is required"))
        .optional("framework", TextRule::new())
        .defaulted("style", EnumRule::new(["concise", "documented", "verbose"]), "documented")
}

rule_set! {
    pub fn code_review => "code-review", Catalog::Ai,
    ObjectRule::new()
        .required("code", required_text("Code is required"))
        .optional("language", TextRule::new())
        .optional(
            "focus",
            Rule::list(EnumRule::new([
                "security",
                "performance",
                "readability",
                "bugs",
                "best-practices",
            ])),
        )
}

rule_set! {
    pub fn sql_query => "sql-query", Catalog::Ai,
    ObjectRule::new()
        .required("description", required_text("Description is required"))
        .optional("schema", TextRule::new())
        .defaulted(
            "dialect",
            EnumRule::new(["postgresql", "mysql", "sqlite", "mssql"]),
            "postgresql",
        )
}

rule_set! {
    pub fn regex_generate => "regex-generate", Catalog::Ai,
    ObjectRule::new()
        .required("description", required_text("Description is required"))
        .optional(
            "examples",
            Rule::list(
                ObjectRule::new()
                    .required("input", TextRule::new())
                    .required("shouldMatch", Rule::boolean()),
            ),
        )
        .defaulted("flavor", EnumRule::new(["javascript", "python", "pcre"]), "javascript")
}

rule_set! {
    pub fn api_docs => "api-docs", Catalog::Ai,
    ObjectRule::new()
        .required("code", required_text("Code is required"))
        .defaulted("format", EnumRule::new(["openapi", "markdown", "jsdoc"]), "markdown")
        .defaulted("includeExamples", Rule::boolean(), true)
}

// Education

rule_set! {
    pub fn quiz_generate => "quiz-generate", Catalog::Ai,
    ObjectRule::new()
        .required("topic", required_text("Topic is required"))
        .defaulted("questionCount", NumberRule::integer().min(1.0).max(50.0), 10)
        .defaulted("difficulty", EnumRule::new(["easy", "medium", "hard"]), "medium")
        .defaulted(
            "type",
            EnumRule::new(["multiple-choice", "true-false", "mixed"]),
            "multiple-choice",
        )
}

/// Every AI rule set, in declaration order
pub fn all() -> Vec<&'static RuleSet> {
    vec![
        image_analyze(),
        image_generate(),
        ocr_extract(),
        text_synthesize(),
        audio_transcribe(),
        text_summarize(),
        text_translate(),
        sentiment_analyze(),
        content_moderate(),
        text_simplify(),
        entity_extract(),
        email_generate(),
        product_description(),
        seo_optimize(),
        code_generate(),
        code_review(),
        sql_query(),
        regex_generate(),
        api_docs(),
        quiz_generate(),
    ]
}

impl_validated! {
    ImageAnalyzeInput => image_analyze,
    ImageGenerateInput => image_generate,
    OcrExtractInput => ocr_extract,
    TextSynthesizeInput => text_synthesize,
    AudioTranscribeInput => audio_transcribe,
    TextSummarizeInput => text_summarize,
    TextTranslateInput => text_translate,
    SentimentAnalyzeInput => sentiment_analyze,
    ContentModerateInput => content_moderate,
    TextSimplifyInput => text_simplify,
    EntityExtractInput => entity_extract,
    EmailGenerateInput => email_generate,
    ProductDescriptionInput => product_description,
    SeoOptimizeInput => seo_optimize,
    CodeGenerateInput => code_generate,
    CodeReviewInput => code_review,
    SqlQueryInput => sql_query,
    RegexGenerateInput => regex_generate,
    ApiDocsInput => api_docs,
    QuizGenerateInput => quiz_generate,
}
