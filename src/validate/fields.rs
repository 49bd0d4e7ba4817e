//! Field-by-field type checking of a raw configuration object.
//!
//! Serde stops at the first mismatch and reports it without a location.
//! Walking the JSON alongside the schema instead decodes every field on its
//! own, so each type or enum mismatch lands at its dotted path. Offending
//! fields are removed from the walked copy; what remains decodes with
//! defaults and can still be range-checked.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::Diagnostics;
use crate::schema::{
    Alignment, BackgroundKind, BorderStyle, DisplayKind, ExportFormat, ExportSize, FontStyle,
    GlowKind, ShapeKind, Texture,
};

/// Gradient `type` tag.
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum GradientKind {
    Linear,
    Radial,
    Conic,
}

type Object = Map<String, Value>;

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode `obj[key]` as `T`; drop the field if that fails.
fn leaf<T: for<'de> Deserialize<'de>>(diag: &mut Diagnostics, obj: &mut Object, prefix: &str, key: &str) {
    let failure = obj.get(key).and_then(|v| T::deserialize(v).err());
    if let Some(e) = failure {
        diag.error(join(prefix, key), e.to_string());
        obj.remove(key);
    }
}

/// Like [`leaf`], but an absent or null field is an issue too.
fn required<T: for<'de> Deserialize<'de>>(
    diag: &mut Diagnostics,
    obj: &mut Object,
    prefix: &str,
    key: &str,
) -> bool {
    if obj.get(key).is_none_or(Value::is_null) {
        diag.error(join(prefix, key), "required");
        obj.remove(key);
        return false;
    }
    let before = diag.len();
    leaf::<T>(diag, obj, prefix, key);
    diag.len() == before
}

/// Nested object at `obj[key]`, if present. Anything else but null is an issue.
fn object<'v>(diag: &mut Diagnostics, obj: &'v mut Object, prefix: &str, key: &str) -> Option<&'v mut Object> {
    let found = match obj.get(key) {
        None | Some(Value::Null) => return None,
        Some(Value::Object(_)) => None,
        Some(other) => Some(type_name(other)),
    };
    if let Some(found) = found {
        diag.error(join(prefix, key), format!("expected an object, got {found}"));
        obj.remove(key);
        return None;
    }
    obj.get_mut(key).and_then(Value::as_object_mut)
}

/// Walk `child` with `f`; drop it from `obj` when anything inside failed.
fn section(
    diag: &mut Diagnostics,
    obj: &mut Object,
    prefix: &str,
    key: &str,
    f: impl FnOnce(&mut Diagnostics, &mut Object, &str),
) {
    let before = diag.len();
    let path = join(prefix, key);
    if let Some(child) = object(diag, obj, prefix, key) {
        f(diag, child, &path);
    }
    if diag.len() > before && matches!(key, "gradient" | "color") {
        // No field-level defaults to fall back on
        obj.remove(key);
    }
}

fn color(diag: &mut Diagnostics, obj: &mut Object, prefix: &str, key: &str) {
    section(diag, obj, prefix, key, |diag, color, path| {
        required::<String>(diag, color, path, "hex");
        leaf::<f64>(diag, color, path, "alpha");
    });
}

fn gradient(diag: &mut Diagnostics, obj: &mut Object, prefix: &str) {
    section(diag, obj, prefix, "gradient", |diag, gradient, path| {
        required::<GradientKind>(diag, gradient, path, "type");
        for key in ["angle", "centerX", "centerY", "radius"] {
            leaf::<f64>(diag, gradient, path, key);
        }

        let stops_path = join(path, "stops");
        match gradient.get_mut("stops") {
            None | Some(Value::Null) => diag.error(stops_path, "required"),
            Some(Value::Array(stops)) => {
                for (i, stop) in stops.iter_mut().enumerate() {
                    let stop_path = format!("{stops_path}.{i}");
                    let found = type_name(stop);
                    match stop.as_object_mut() {
                        Some(stop) => {
                            if stop.get("color").is_none_or(Value::is_null) {
                                diag.error(join(&stop_path, "color"), "required");
                            } else {
                                color(diag, stop, &stop_path, "color");
                            }
                            required::<f64>(diag, stop, &stop_path, "position");
                        }
                        None => diag.error(stop_path, format!("expected an object, got {found}")),
                    }
                }
            }
            Some(other) => diag.error(stops_path, format!("expected an array, got {}", type_name(other))),
        }
    });
}

/// Type-check every known field of a configuration object in place.
///
/// Returns `false` when `value` is not an object at all.
pub fn check_fields(diag: &mut Diagnostics, value: &mut Value, root: &str) -> bool {
    if !value.is_object() {
        diag.error(root, format!("expected an object, got {}", type_name(value)));
        return false;
    }
    let Some(config) = value.as_object_mut() else {
        return false;
    };

    if !required::<String>(diag, config, "", "name") {
        // Stand-in so the remaining sections can still be range-checked
        config.insert("name".into(), Value::String("-".into()));
    }

    section(diag, config, "", "shape", |diag, shape, path| {
        leaf::<ShapeKind>(diag, shape, path, "type");
        leaf::<f64>(diag, shape, path, "radius");
        section(diag, shape, path, "border", |diag, border, path| {
            leaf::<f64>(diag, border, path, "width");
            color(diag, border, path, "color");
            leaf::<BorderStyle>(diag, border, path, "style");
        });
        section(diag, shape, path, "glow", |diag, glow, path| {
            leaf::<bool>(diag, glow, path, "enabled");
            leaf::<GlowKind>(diag, glow, path, "type");
            leaf::<f64>(diag, glow, path, "blur");
            leaf::<f64>(diag, glow, path, "spread");
            color(diag, glow, path, "color");
        });
    });

    section(diag, config, "", "background", |diag, background, path| {
        leaf::<BackgroundKind>(diag, background, path, "type");
        color(diag, background, path, "color");
        gradient(diag, background, path);
        leaf::<Option<String>>(diag, background, path, "imageUrl");
        leaf::<Option<Texture>>(diag, background, path, "texture");
        leaf::<bool>(diag, background, path, "transparency");
    });

    section(diag, config, "", "typography", |diag, typography, path| {
        leaf::<String>(diag, typography, path, "fontFamily");
        leaf::<i32>(diag, typography, path, "weight");
        leaf::<FontStyle>(diag, typography, path, "style");
        leaf::<Alignment>(diag, typography, path, "alignment");
        section(diag, typography, path, "shadow", |diag, shadow, path| {
            leaf::<bool>(diag, shadow, path, "enabled");
            for key in ["offsetX", "offsetY", "blur"] {
                leaf::<f64>(diag, shadow, path, key);
            }
            color(diag, shadow, path, "color");
        });
        section(diag, typography, path, "outline", |diag, outline, path| {
            leaf::<bool>(diag, outline, path, "enabled");
            leaf::<f64>(diag, outline, path, "width");
            color(diag, outline, path, "color");
        });
    });

    section(diag, config, "", "displayMode", |diag, mode, path| {
        leaf::<DisplayKind>(diag, mode, path, "type");
        leaf::<i32>(diag, mode, path, "maxWords");
        leaf::<Option<String>>(diag, mode, path, "emoji");
    });

    section(diag, config, "", "export", |diag, export, path| {
        leaf::<ExportFormat>(diag, export, path, "format");
        leaf::<i32>(diag, export, path, "quality");
        leaf::<ExportSize>(diag, export, path, "size");
        leaf::<bool>(diag, export, path, "transparency");
    });

    section(diag, config, "", "filters", |diag, filters, path| {
        for key in ["grayscale", "sepia", "blur", "brightness"] {
            leaf::<i32>(diag, filters, path, key);
        }
    });

    leaf::<bool>(diag, config, "", "generateFavicon");
    leaf::<bool>(diag, config, "", "generateQR");
    leaf::<Option<String>>(diag, config, "", "qrData");
    true
}
