#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-pipeline-ui]";

/// Default CSS for the component along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --pipeline-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --pipeline-bg: #ffffff;
  --pipeline-text: #1f2933;
  --pipeline-muted: #52606d;
  --pipeline-heading: #11181c;
  --pipeline-border: rgba(148, 163, 184, 0.35);
  --pipeline-surface: #f8fafc;
  --pipeline-radius: 10px;
  --pipeline-column-width: 220px;
  --pipeline-bar-bg: #3e4784;
  --pipeline-bar-text: #ffffff;
  --pipeline-bar-line: rgba(62, 71, 132, 0.45);
  --pipeline-error-text: #b42318;
  --pipeline-error-bg: rgba(180, 35, 24, 0.08);
}

.pipeline-band {
  height: 0;
  overflow: hidden;
  display: flex;
  align-items: center;
  justify-content: center;
  background: var(--pipeline-surface);
}

.pipeline-band-image {
  max-width: 100%;
  max-height: 100%;
  object-fit: contain;
}

.pipeline-content {
  position: relative;
  overflow: hidden;
}

.pipeline-root {
  font-family: var(--pipeline-font-family);
  background: var(--pipeline-bg);
  color: var(--pipeline-text);
  display: flex;
  flex-direction: column;
  gap: 12px;
  height: 100%;
  padding: 14px;
  box-sizing: border-box;
}

.pipeline-header {
  display: flex;
  align-items: baseline;
  justify-content: space-between;
  gap: 12px;
}

.pipeline-title {
  margin: 0;
  font-size: 1.15rem;
  color: var(--pipeline-heading);
}

.pipeline-cap-note {
  margin: 0;
  font-size: 0.78rem;
  color: var(--pipeline-muted);
  font-style: italic;
}

.pipeline-bar-track {
  position: relative;
  overflow: hidden;
  flex: 0 0 56px;
}

.pipeline-bar {
  position: relative;
  display: flex;
  gap: 12px;
  height: 56px;
  width: max-content;
}

.pipeline-phase {
  position: relative;
  flex: 0 0 var(--pipeline-column-width);
  display: flex;
  align-items: center;
  justify-content: center;
  gap: 8px;
  background: var(--pipeline-bar-bg);
  color: var(--pipeline-bar-text);
  border-radius: var(--pipeline-radius);
  padding: 0 12px;
  box-sizing: border-box;
}

.pipeline-phase::before {
  content: "";
  position: absolute;
  right: -12px;
  top: 50%;
  width: 12px;
  height: 2px;
  background: var(--pipeline-bar-line);
}

.pipeline-phase::after {
  content: "";
  position: absolute;
  right: -9px;
  top: 50%;
  transform: translateY(-50%);
  border-top: 8px solid transparent;
  border-bottom: 8px solid transparent;
  border-left: 8px solid var(--pipeline-bar-bg);
}

.pipeline-phase:last-child::before,
.pipeline-phase:last-child::after {
  display: none;
}

.pipeline-phase-label {
  font-size: 0.82rem;
  font-weight: 600;
  letter-spacing: 0.06em;
  text-transform: uppercase;
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}

.pipeline-phase-count {
  font-size: 0.76rem;
  background: rgba(255, 255, 255, 0.22);
  border-radius: 999px;
  padding: 2px 8px;
  font-variant-numeric: tabular-nums;
}

.pipeline-companies {
  display: flex;
  gap: 12px;
  overflow: auto;
  align-items: flex-start;
  padding-bottom: 6px;
}

.pipeline-companies::-webkit-scrollbar {
  height: 6px;
  width: 6px;
}

.pipeline-companies::-webkit-scrollbar-thumb {
  background: rgba(148, 163, 184, 0.4);
  border-radius: 999px;
}

.pipeline-column {
  flex: 0 0 var(--pipeline-column-width);
  display: flex;
  flex-direction: column;
  gap: 8px;
}

.pipeline-column-empty {
  margin: 0;
  font-size: 0.8rem;
  color: var(--pipeline-muted);
  font-style: italic;
  text-align: center;
  border: 1px dashed var(--pipeline-border);
  border-radius: var(--pipeline-radius);
  padding: 10px;
}

.pipeline-company {
  background: var(--pipeline-surface);
  border: 1px solid var(--pipeline-border);
  border-left: 4px solid var(--pipeline-border);
  border-radius: var(--pipeline-radius);
  padding: 8px 10px;
  display: flex;
  flex-direction: column;
  gap: 2px;
}

.pipeline-company-title {
  font-size: 0.88rem;
  font-weight: 600;
}

.pipeline-company-name {
  font-size: 0.78rem;
}

.pipeline-legend {
  display: flex;
  flex-wrap: wrap;
  gap: 8px 16px;
  padding-top: 10px;
  border-top: 1px solid var(--pipeline-border);
}

.pipeline-legend:empty {
  display: none;
}

.pipeline-legend-item {
  display: inline-flex;
  align-items: center;
  gap: 6px;
  font-size: 0.8rem;
  font-weight: 600;
}

.pipeline-swatch {
  width: 10px;
  height: 10px;
  border-radius: 3px;
  display: inline-block;
}

.pipeline-empty {
  margin: 0;
  background: var(--pipeline-surface);
  border: 1px dashed var(--pipeline-border);
  border-radius: var(--pipeline-radius);
  padding: 20px;
  text-align: center;
  color: var(--pipeline-muted);
  font-style: italic;
}

.pipeline-error {
  margin: 12px;
  color: var(--pipeline-error-text);
  background: var(--pipeline-error-bg);
  border: 1px solid rgba(180, 35, 24, 0.35);
  border-radius: var(--pipeline-radius);
  padding: 12px 16px;
  font-size: 0.9rem;
  font-family: var(--pipeline-font-family);
}

@media (max-width: 640px) {
  .pipeline-root {
    padding: 10px;
  }

  .pipeline-header {
    flex-direction: column;
    align-items: flex-start;
    gap: 4px;
  }

  .pipeline-phase,
  .pipeline-column {
    flex-basis: 170px;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-pipeline-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
