//! Geometry resolution: from a partially specified [`ResizeRequest`] and the
//! (already auto-oriented) source size to an exact [`ResizePlan`].
//!
//! | Fit | Given | Result |
//! |---|---|---|
//! | `exact` | w, h | exactly w×h, aspect ignored |
//! | `cover` | w, h | exactly w×h, scaled to cover then center-cropped |
//! | `contain` + keep aspect | w *or* h | given edge, other derived from source aspect |
//! | `contain` + keep aspect | w, h | largest aspect-preserving size inside w×h |
//! | `contain`, no keep aspect | w and/or h | w×h, missing edge taken from source |
//!
//! Resampling always uses [`RESAMPLE_FILTER`].

use super::calculations::{calculate_contain_dimensions, calculate_fill_dimensions, derive_edge};
use super::params::{Dimensions, FitMode, Resample, ResizePlan, ResizeRequest};
use crate::error::Result;
use image::imageops::FilterType;

/// The one interpolation filter used for both upscaling and downscaling.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Resolve the exact output size for `request` applied to `source`.
pub fn resolve_geometry(source: Dimensions, request: &ResizeRequest) -> Result<ResizePlan> {
    request.validate()?;

    let src = (source.width, source.height);
    let or_source = |w: Option<u32>, h: Option<u32>| {
        Dimensions::new(w.unwrap_or(source.width), h.unwrap_or(source.height))
    };

    let plan = match request.fit {
        FitMode::Exact => ResizePlan {
            // validate() guarantees both edges; the source fallback never fires.
            target: or_source(request.width, request.height),
            resample: Resample::Scale,
        },
        FitMode::Cover => {
            let target = or_source(request.width, request.height);
            let (fill_w, fill_h) = calculate_fill_dimensions(src, (target.width, target.height));
            ResizePlan {
                target,
                resample: Resample::FillCrop {
                    fill: Dimensions::new(fill_w, fill_h),
                },
            }
        }
        FitMode::Contain if request.keep_aspect => {
            let (w, h) = match (request.width, request.height) {
                (Some(w), Some(h)) => calculate_contain_dimensions(src, (w, h)),
                (Some(w), None) => (w, derive_edge(w, source.width, source.height)),
                (None, Some(h)) => (derive_edge(h, source.height, source.width), h),
                (None, None) => src,
            };
            ResizePlan {
                target: Dimensions::new(w, h),
                resample: Resample::Scale,
            }
        }
        FitMode::Contain => ResizePlan {
            target: or_source(request.width, request.height),
            resample: Resample::Scale,
        },
    };

    tracing::debug!(
        source = %source,
        target = %plan.target,
        fit = %request.fit,
        "resolved geometry"
    );
    Ok(plan)
}
