//! DOM queries, element clicks, and input filling.

use serde_json::json;

use crate::error::CdpError;
use crate::protocol::{BoxModel, DomNode};
use crate::session::js::js_string;
use crate::session::PageSession;

/// Which node to act on when a selector matches several.
///
/// Chat transcripts stack messages under one selector; replies are almost
/// always read from the last match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    First,
    Last,
    Nth(usize),
}

impl Pick {
    /// Resolve to an index into `len` matches, if one exists.
    pub fn index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self {
            Pick::First => Some(0),
            Pick::Last => Some(len - 1),
            Pick::Nth(n) => (*n < len).then_some(*n),
        }
    }

    /// JS expression selecting the picked element from a NodeList `ns`.
    pub(crate) fn js_index(&self) -> String {
        match self {
            Pick::First => "0".to_string(),
            Pick::Last => "ns.length - 1".to_string(),
            Pick::Nth(n) => n.to_string(),
        }
    }
}

impl PageSession {
    /// Get document root node.
    pub async fn get_document(&self) -> Result<DomNode, CdpError> {
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": -1, "pierce": true})))
            .await?;

        let root: DomNode = serde_json::from_value(result["root"].clone())?;
        Ok(root)
    }

    /// Query selector. Returns the node ID, or None when nothing matches.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.get_document().await?;

        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({
                    "nodeId": doc.node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_id = result["nodeId"].as_i64().unwrap_or(0);
        if node_id == 0 {
            Ok(None)
        } else {
            Ok(Some(node_id))
        }
    }

    /// Query selector all.
    pub async fn query_selector_all(&self, selector: &str) -> Result<Vec<i64>, CdpError> {
        let doc = self.get_document().await?;

        let result = self
            .call(
                "DOM.querySelectorAll",
                Some(json!({
                    "nodeId": doc.node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_ids: Vec<i64> = result["nodeIds"]
            .as_array()
            .map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect())
            .unwrap_or_default();

        Ok(node_ids)
    }

    /// Get box model for node. None when the node has no layout (hidden).
    pub async fn get_box_model(&self, node_id: i64) -> Result<Option<BoxModel>, CdpError> {
        let result = self
            .call("DOM.getBoxModel", Some(json!({"nodeId": node_id})))
            .await;

        match result {
            Ok(r) => {
                let model: BoxModel = serde_json::from_value(r["model"].clone())?;
                Ok(Some(model))
            }
            Err(CdpError::Protocol { code: -32000, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Focus element.
    pub async fn focus(&self, node_id: i64) -> Result<(), CdpError> {
        self.call("DOM.focus", Some(json!({"nodeId": node_id})))
            .await?;
        Ok(())
    }

    /// Set node value: focus, select all, insert replacement text.
    ///
    /// `Input.insertText` produces trusted input events, so framework-managed
    /// editors (React textareas, Quill contenteditables) observe the change.
    pub async fn set_node_value(&self, node_id: i64, value: &str) -> Result<(), CdpError> {
        self.focus(node_id).await?;
        self.press_key_combo("Control+a").await?;
        self.type_text(value).await?;
        Ok(())
    }

    /// Click on element by selector.
    pub async fn click_selector(&self, selector: &str) -> Result<(), CdpError> {
        self.click_selector_pick(selector, Pick::First).await
    }

    /// Click on the picked element among the selector's matches.
    pub async fn click_selector_pick(&self, selector: &str, pick: Pick) -> Result<(), CdpError> {
        let nodes = self.query_selector_all(selector).await?;
        let idx = pick
            .index(nodes.len())
            .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))?;
        let node_id = nodes[idx];

        // Best effort; not all Chrome builds expose it
        let _ = self
            .call(
                "DOM.scrollIntoViewIfNeeded",
                Some(json!({"nodeId": node_id})),
            )
            .await;

        match self.get_box_model(node_id).await? {
            Some(model) => {
                let (x, y) = Self::quad_center(&model.content);
                self.click(x, y).await
            }
            None => {
                // No layout box; fall back to a DOM-level click
                let js = format!(
                    "(() => {{ const ns = document.querySelectorAll({}); \
                     const el = ns[{}]; if (!el) return false; el.click(); return true; }})()",
                    js_string(selector),
                    pick.js_index()
                );
                match self.evaluate(&js).await?.as_bool() {
                    Some(true) => Ok(()),
                    _ => Err(CdpError::ElementNotFound(format!(
                        "{} (not clickable)",
                        selector
                    ))),
                }
            }
        }
    }

    /// Fill input by selector.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<(), CdpError> {
        let node_id = self
            .query_selector(selector)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))?;

        self.set_node_value(node_id, value).await
    }

    /// Rendered text of the picked element. None when nothing matches.
    pub async fn inner_text(&self, selector: &str, pick: Pick) -> Result<Option<String>, CdpError> {
        let js = format!(
            "(() => {{ const ns = document.querySelectorAll({}); \
             if (!ns.length) return null; const el = ns[{}]; \
             return el ? el.innerText : null; }})()",
            js_string(selector),
            pick.js_index()
        );
        let value = self.evaluate(&js).await?;
        Ok(value.as_str().map(|s| s.to_string()))
    }

    /// Rendered text of every element the selector matches, in DOM order.
    pub async fn inner_texts(&self, selector: &str) -> Result<Vec<String>, CdpError> {
        let js = format!(
            "Array.from(document.querySelectorAll({})).map(el => el.innerText)",
            js_string(selector)
        );
        let value = self.evaluate(&js).await?;
        let texts = value
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(texts)
    }

    /// Calculate center point of a quad.
    pub(super) fn quad_center(quad: &[f64]) -> (f64, f64) {
        if quad.len() >= 8 {
            let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
            let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
            (x, y)
        } else {
            (0.0, 0.0)
        }
    }
}
