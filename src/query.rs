//! Read-side queries for collaborators: conversion status and slide
//! navigation.
//!
//! These are the payloads a detail page or the fullscreen presentation-mode
//! API renders. All structs serialize with `serde`, so a web layer can pass
//! them straight through as JSON. An out-of-range slide number is a
//! structured client error ([`OutOfRangePayload`], the 400-equivalent body),
//! never a crash; a slide that `total_slides` promises but that has no record
//! is a data-integrity gap and surfaces as
//! [`Pdf2SlidesError::SlideNotFound`].

use crate::error::Pdf2SlidesError;
use crate::model::PresentationId;
use crate::store::PresentationStore;
use serde::{Deserialize, Serialize};

/// Conversion-state summary of a presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStatus {
    pub is_converted: bool,
    /// Authoritative count recorded by the last completed attempt.
    pub total_slides: u32,
    /// Count of slide records actually persisted right now.
    pub slides_count: u32,
    pub has_pdf: bool,
    pub pdf_filename: String,
    pub pdf_size_mb: f64,
}

/// One slide of the fullscreen presentation-mode API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideView {
    pub slide_image_url: String,
    pub slide_number: u32,
    pub total_slides: u32,
    pub presentation_title: String,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Structured client error for a slide number outside `[1, total_slides]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutOfRangePayload {
    pub error: String,
    /// Slide the client should fall back to.
    pub current_slide: u32,
    pub total_slides: u32,
}

/// Result of a navigation request that found the presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlideNavigation {
    Slide(SlideView),
    /// 400-equivalent outcome.
    OutOfRange(OutOfRangePayload),
}

/// Conversion status of a presentation.
pub fn conversion_status(
    store: &PresentationStore,
    id: PresentationId,
) -> Result<ConversionStatus, Pdf2SlidesError> {
    let record = store.get(id)?;
    Ok(ConversionStatus {
        is_converted: record.is_converted,
        total_slides: record.total_slides,
        slides_count: store.slides_of(id).len() as u32,
        has_pdf: record.pdf.is_some(),
        pdf_filename: record.pdf_filename().to_string(),
        pdf_size_mb: record.pdf_size_mb(),
    })
}

/// Resolve a 1-based slide number for the presentation-mode API.
///
/// # Errors
/// * [`Pdf2SlidesError::PresentationNotFound`] — unknown presentation
/// * [`Pdf2SlidesError::SlideNotFound`] — number within the advertised range
///   but the record is missing
pub fn navigate(
    store: &PresentationStore,
    id: PresentationId,
    slide_number: u32,
) -> Result<SlideNavigation, Pdf2SlidesError> {
    let record = store.get(id)?;
    let total_slides = record.total_slides;

    if slide_number < 1 || slide_number > total_slides {
        return Ok(SlideNavigation::OutOfRange(OutOfRangePayload {
            error: "Invalid slide number".to_string(),
            current_slide: 1,
            total_slides,
        }));
    }

    let slide = store
        .slide(id, slide_number)
        .ok_or(Pdf2SlidesError::SlideNotFound {
            presentation_id: id,
            slide_number,
        })?;

    Ok(SlideNavigation::Slide(SlideView {
        slide_image_url: format!("/media/{}", slide.image.path),
        slide_number,
        total_slides,
        presentation_title: record.title,
        has_previous: slide_number > 1,
        has_next: slide_number < total_slides,
    }))
}
