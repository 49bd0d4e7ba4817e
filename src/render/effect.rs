//! Filter chains for text effects and whole-image adjustments.

use std::fmt::Write;

use super::{Fragment, RenderContext, num};
use crate::schema::{Filters, TextOutline, TextShadow};

/// Combined shadow/outline filter for the text element.
///
/// `None` when neither effect is enabled.
pub fn text_effects(
    shadow: Option<&TextShadow>,
    outline: Option<&TextOutline>,
    ctx: &mut RenderContext,
) -> Option<Fragment> {
    let shadow = shadow.filter(|s| s.enabled);
    let outline = outline.filter(|o| o.enabled);
    if shadow.is_none() && outline.is_none() {
        return None;
    }

    let id = ctx.next_id("text-effects");
    let mut primitives = String::new();
    let mut base = "SourceGraphic";

    if let Some(shadow) = shadow {
        let _ = write!(
            primitives,
            r#"<feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}" result="shadowed"/>"#,
            num(shadow.offset_x),
            num(shadow.offset_y),
            num(shadow.blur),
            shadow.color.hex,
            num(shadow.color.alpha)
        );
        base = "shadowed";
    }

    if let Some(outline) = outline {
        let _ = write!(
            primitives,
            r#"<feMorphology in="SourceAlpha" operator="dilate" radius="{}" result="dilated"/>
               <feFlood flood-color="{}" flood-opacity="{}"/>
               <feComposite in2="dilated" operator="in" result="outline"/>
               <feMerge><feMergeNode in="outline"/><feMergeNode in="{base}"/></feMerge>"#,
            num(outline.width),
            outline.color.hex,
            num(outline.color.alpha)
        );
    }

    Some(Fragment {
        defs: format!(
            r#"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%">{primitives}</filter>"#
        ),
        attr: format!(r#"filter="url(#{id})""#),
    })
}

/// Sepia color matrix blended toward identity by `amount` in `[0, 1]`.
fn sepia_matrix(amount: f64) -> [f64; 9] {
    let k = 1.0 - amount;
    [
        0.393 + 0.607 * k,
        0.769 - 0.769 * k,
        0.189 - 0.189 * k,
        0.349 - 0.349 * k,
        0.686 + 0.314 * k,
        0.168 - 0.168 * k,
        0.272 - 0.272 * k,
        0.534 - 0.534 * k,
        0.131 + 0.869 * k,
    ]
}

/// Image adjustment chain in fixed order: grayscale, sepia, blur, brightness.
///
/// The identity configuration emits nothing at all.
pub fn image_filters(filters: &Filters, ctx: &mut RenderContext) -> Option<Fragment> {
    if filters.is_identity() {
        return None;
    }

    let mut primitives = String::new();

    if filters.grayscale > 0 {
        let _ = write!(
            primitives,
            r#"<feColorMatrix type="saturate" values="{}"/>"#,
            num(1.0 - f64::from(filters.grayscale) / 100.0)
        );
    }

    if filters.sepia > 0 {
        let m = sepia_matrix(f64::from(filters.sepia) / 100.0).map(num);
        let _ = write!(
            primitives,
            r#"<feColorMatrix type="matrix" values="{} {} {} 0 0 {} {} {} 0 0 {} {} {} 0 0 0 0 0 1 0"/>"#,
            m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8]
        );
    }

    if filters.blur > 0 {
        let _ = write!(
            primitives,
            r#"<feGaussianBlur stdDeviation="{}"/>"#,
            filters.blur
        );
    }

    // Scales the alpha channel, not luminance.
    if filters.brightness != 100 {
        let _ = write!(
            primitives,
            r#"<feComponentTransfer><feFuncA type="discrete" tableValues="{}"/></feComponentTransfer>"#,
            num(f64::from(filters.brightness) / 100.0)
        );
    }

    if primitives.is_empty() {
        return None;
    }

    let id = ctx.next_id("image-filters");
    Some(Fragment {
        defs: format!(
            r#"<filter id="{id}" x="0%" y="0%" width="100%" height="100%">{primitives}</filter>"#
        ),
        attr: format!(r#"filter="url(#{id})""#),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_text_effects_when_disabled() {
        let mut ctx = RenderContext::new(0);
        assert!(text_effects(None, None, &mut ctx).is_none());
        let shadow = TextShadow::default();
        let outline = TextOutline::default();
        assert!(text_effects(Some(&shadow), Some(&outline), &mut ctx).is_none());
    }

    #[test]
    fn test_shadow_and_outline_share_one_filter() {
        let mut ctx = RenderContext::new(0);
        let shadow = TextShadow {
            enabled: true,
            ..TextShadow::default()
        };
        let outline = TextOutline {
            enabled: true,
            ..TextOutline::default()
        };
        let fragment = text_effects(Some(&shadow), Some(&outline), &mut ctx).unwrap();
        assert_eq!(fragment.defs.matches("<filter").count(), 1);
        assert!(fragment.defs.contains(r#"dx="2" dy="2" stdDeviation="4""#));
        assert!(fragment.defs.contains(r#"flood-opacity="0.5""#));
        assert!(fragment.defs.contains(r#"<feMergeNode in="shadowed"/>"#));
    }

    #[test]
    fn test_identity_filters_emit_nothing() {
        let mut ctx = RenderContext::new(0);
        assert!(image_filters(&Filters::default(), &mut ctx).is_none());
    }

    #[test]
    fn test_filter_order() {
        let mut ctx = RenderContext::new(0);
        let filters = Filters {
            grayscale: 50,
            sepia: 100,
            blur: 2,
            brightness: 80,
        };
        let defs = image_filters(&filters, &mut ctx).unwrap().defs;
        let at = |needle: &str| defs.find(needle).unwrap();
        assert!(at(r#"type="saturate" values="0.5""#) < at(r#"type="matrix""#));
        assert!(at(r#"type="matrix""#) < at("feGaussianBlur"));
        assert!(at("feGaussianBlur") < at(r#"tableValues="0.8""#));
    }

    #[test]
    fn test_full_sepia_matrix() {
        let m = sepia_matrix(1.0);
        assert!((m[0] - 0.393).abs() < 1e-12);
        assert!((m[8] - 0.131).abs() < 1e-12);
        let identity = sepia_matrix(0.0);
        assert!((identity[0] - 1.0).abs() < 1e-12);
        assert!(identity[1].abs() < 1e-12);
    }

    #[test]
    fn test_only_brightness() {
        let mut ctx = RenderContext::new(0);
        let filters = Filters {
            brightness: 120,
            ..Filters::default()
        };
        let defs = image_filters(&filters, &mut ctx).unwrap().defs;
        assert!(defs.contains(r#"tableValues="1.2""#));
        assert!(!defs.contains("feColorMatrix"));
    }
}
