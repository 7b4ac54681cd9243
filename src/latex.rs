//! Math-renderer seam for card text.
//!
//! Card text may contain TeX math between the usual delimiter pairs. An
//! optional renderer is applied to each delimited span before display; a
//! rendering failure is logged and the raw span (delimiters included) is
//! shown instead. With no renderer installed the text passes through
//! untouched.

use thiserror::Error;
use tracing::warn;

/// Delimiter pairs scanned for, longest openers first so `$$` is not read as
/// two inline `$` spans. The bool marks display (block) math.
const DELIMITERS: [(&str, &str, bool); 4] = [
    ("$$", "$$", true),
    ("\\[", "\\]", true),
    ("\\(", "\\)", false),
    ("$", "$", false),
];

#[derive(Debug, Error)]
#[error("math rendering failed: {0}")]
pub struct RenderError(pub String);

/// Renders one math span for terminal display.
pub trait MathRenderer {
    fn render(&self, math: &str, display: bool) -> Result<String, RenderError>;
}

/// Replace delimited math spans in `text` using `renderer`.
pub fn render_math(text: &str, renderer: Option<&dyn MathRenderer>) -> String {
    let Some(renderer) = renderer else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while !rest.is_empty() {
        for (open, close, display) in DELIMITERS {
            if let Some(after_open) = rest.strip_prefix(open) {
                let Some(end) = after_open.find(close) else {
                    continue;
                };
                let inner = &after_open[..end];
                match renderer.render(inner, display) {
                    Ok(rendered) => out.push_str(&rendered),
                    Err(err) => {
                        warn!(span = inner, error = %err, "math rendering failed");
                        out.push_str(open);
                        out.push_str(inner);
                        out.push_str(close);
                    }
                }
                rest = &after_open[end + close.len()..];
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

/// Built-in fallback renderer: strips the delimiters and rewrites a handful
/// of TeX escapes to their Unicode forms. Never fails.
#[derive(Debug, Default)]
pub struct PlainTextMath;

impl MathRenderer for PlainTextMath {
    fn render(&self, math: &str, _display: bool) -> Result<String, RenderError> {
        const REWRITES: [(&str, &str); 12] = [
            ("\\times", "×"),
            ("\\cdot", "·"),
            ("\\pm", "±"),
            ("\\leq", "≤"),
            ("\\geq", "≥"),
            ("\\neq", "≠"),
            ("\\approx", "≈"),
            ("\\pi", "π"),
            ("\\infty", "∞"),
            ("\\rightarrow", "→"),
            ("\\left", ""),
            ("\\right", ""),
        ];
        let mut out = math.trim().to_string();
        for (tex, uni) in REWRITES {
            out = out.replace(tex, uni);
        }
        Ok(out)
    }
}
