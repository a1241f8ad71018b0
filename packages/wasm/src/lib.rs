//! Browser bindings for the in-place editor.
//!
//! The page is mounted from a JSON array of `VNode` roots. `tree()` returns
//! the live page with an `id` on every node, and those ids are the handles
//! `trigger` takes. Ids are not positions: an edit can replace some nodes, so
//! the JS side should read them from the latest `tree()` after each call.
//! Highlight expiry is scheduled by the JS side with `setTimeout(delayMs)`.

use liveedit_editor::{
    CommittedEdit, Dismissal, EditController, EditorConfig, HighlightToken, NodeId, SessionId,
    SurfaceIntent, Trigger, TriggerGesture, VDocument,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct LiveEditor {
    tree: VDocument,
    controller: EditController,
}

#[wasm_bindgen]
impl LiveEditor {
    /// Mount a page from its JSON description, with an optional config
    #[wasm_bindgen(constructor)]
    pub fn new(tree_json: &str, config_json: Option<String>) -> Result<LiveEditor, JsValue> {
        let tree = VDocument::from_json(tree_json).map_err(js_error)?;
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(js_error)?,
            None => EditorConfig::default(),
        };

        Ok(LiveEditor {
            tree,
            controller: EditController::new(config),
        })
    }

    /// Forward a gesture; returns the dispatch outcome as JSON
    pub fn trigger(&mut self, node: u32, gesture: &str) -> Result<String, JsValue> {
        let gesture: TriggerGesture = from_name(gesture)?;
        let outcome = self
            .controller
            .handle_trigger(&mut self.tree, Trigger::new(NodeId::new(node), gesture));

        serde_json::to_string(&outcome).map_err(js_error)
    }

    /// Preview a candidate value
    pub fn apply(&mut self, value: &str) -> Result<(), JsValue> {
        self.controller
            .handle_intent(&mut self.tree, SurfaceIntent::Input { value: value.to_string() })
            .map(|_| ())
            .map_err(js_error)
    }

    /// Commit the open session; returns the committed edit as JSON, or
    /// `null` when the target vanished before commit
    pub fn commit(&mut self) -> Result<String, JsValue> {
        let closed = self
            .controller
            .handle_intent(&mut self.tree, SurfaceIntent::Commit)
            .map_err(js_error)?;

        let edit = closed
            .filter(|c| !c.detached)
            .map(|c| CommittedEdit::from_closed(&c));
        serde_json::to_string(&edit).map_err(js_error)
    }

    pub fn cancel(&mut self) -> Result<(), JsValue> {
        self.dismiss("cancelButton")
    }

    /// Close the dialog by any affordance (`backdrop`, `closeIcon`, `escape`,
    /// `cancelButton`); always reverts
    pub fn dismiss(&mut self, via: &str) -> Result<(), JsValue> {
        let via: Dismissal = from_name(via)?;
        self.controller
            .handle_intent(&mut self.tree, SurfaceIntent::Dismiss { via })
            .map(|_| ())
            .map_err(js_error)
    }

    /// Highlight timer callback; `session` is the token from `trigger`
    #[wasm_bindgen(js_name = expireHighlight)]
    pub fn expire_highlight(&mut self, session: u32) -> bool {
        let token = HighlightToken::for_session(SessionId::new(u64::from(session)));
        self.controller.expire_highlight(&mut self.tree, token)
    }

    #[wasm_bindgen(js_name = isEditing)]
    pub fn is_editing(&self) -> bool {
        self.controller.is_editing()
    }

    /// Edit dialog contents as JSON, if a session is open
    pub fn surface(&self) -> Result<Option<String>, JsValue> {
        self.controller
            .surface()
            .map(|view| serde_json::to_string(&view).map_err(js_error))
            .transpose()
    }

    /// Current page as a JSON array of roots, each node carrying its `id`
    pub fn tree(&self) -> Result<String, JsValue> {
        self.tree.to_mounted_json().map_err(js_error)
    }

    /// Commits awaiting persistence, as JSON
    #[wasm_bindgen(js_name = pendingEdits)]
    pub fn pending_edits(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.controller.sink().pending()).map_err(js_error)
    }

    /// Acknowledge a pending edit after it was persisted
    #[wasm_bindgen(js_name = confirmEdit)]
    pub fn confirm_edit(&mut self, id: &str) -> bool {
        self.controller.sink_mut().confirm(id)
    }
}

/// Parse a camelCase enum name such as `doubleClick`
fn from_name<T: DeserializeOwned>(name: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(name.to_string())).map_err(js_error)
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
