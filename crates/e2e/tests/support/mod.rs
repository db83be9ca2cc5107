//! In-memory browser for interaction-layer tests
//!
//! Documents form a tree through iframes; nodes carry the locators they match,
//! their visibility and enabled state, and optional click/input side effects.
//! Every driver call is recorded so tests can assert on exact interaction
//! order. Element handles are only valid in the document they came from.

#![allow(dead_code)]

use async_trait::async_trait;
use onboard_common::{Locator, RunConfig, TimeoutConfig};
use onboard_e2e::{Driver, E2eError, E2eResult, ElementHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub type Effect = Arc<dyn Fn(&mut Dom) + Send + Sync>;
pub type InputEffect = Arc<dyn Fn(&mut Dom, usize) + Send + Sync>;
pub type GotoEffect = Arc<dyn Fn(&mut Dom, &str) + Send + Sync>;

pub const TOP: usize = 0;

/// Millisecond-scale budgets so failing waits finish quickly
pub fn fast_timeouts() -> TimeoutConfig {
    TimeoutConfig {
        default_ms: 400,
        probe_ms: 150,
        poll_ms: 10,
        page_load_ms: 400,
    }
}

pub fn live_config(artifacts: &std::path::Path) -> RunConfig {
    RunConfig {
        dry_run: false,
        artifacts_dir: artifacts.to_path_buf(),
        assets_dir: artifacts.join("no-assets"),
        timeouts: fast_timeouts(),
        ..Default::default()
    }
}

#[derive(Clone)]
pub struct Node {
    pub doc: usize,
    pub parent: Option<usize>,
    pub tag: String,
    pub text: String,
    pub value: String,
    pub attrs: HashMap<String, String>,
    pub displayed: bool,
    pub enabled: bool,
    pub removed: bool,
    pub native_click_fails: bool,
    pub locators: Vec<Locator>,
    /// Document entered through this node when it is an iframe
    pub frame: Option<usize>,
    on_click: Option<Effect>,
    on_input: Option<InputEffect>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            doc: TOP,
            parent: None,
            tag: tag.to_string(),
            text: String::new(),
            value: String::new(),
            attrs: HashMap::new(),
            displayed: true,
            enabled: true,
            removed: false,
            native_click_fails: false,
            locators: Vec::new(),
            frame: None,
            on_click: None,
            on_input: None,
        }
    }

    pub fn matching(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn css(self, expr: &str) -> Self {
        self.matching(Locator::css(expr))
    }

    pub fn xpath(self, expr: &str) -> Self {
        self.matching(Locator::xpath(expr))
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn native_click_fails(mut self) -> Self {
        self.native_click_fails = true;
        self
    }
}

struct Doc {
    parent: Option<usize>,
    /// iframe nodes of this document, in DOM order
    frame_nodes: Vec<usize>,
}

pub struct Dom {
    pub nodes: Vec<Node>,
    docs: Vec<Doc>,
    pub current: usize,
    pub url: String,
    pub calls: Vec<String>,
    /// Every lookup fails, as with a dead session
    pub broken: bool,
    pub fail_capture: bool,
    on_goto: Option<GotoEffect>,
}

impl Dom {
    pub fn node(&mut self, id: usize) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn set_text(&mut self, id: usize, text: &str) {
        self.nodes[id].text = text.to_string();
    }

    pub fn show(&mut self, id: usize, displayed: bool) {
        self.nodes[id].displayed = displayed;
    }

    pub fn enable(&mut self, id: usize, enabled: bool) {
        self.nodes[id].enabled = enabled;
    }

    fn handle(id: usize) -> ElementHandle {
        ElementHandle::new(format!("n{}", id))
    }

    /// Resolve a handle, failing for nodes outside the current document
    fn resolve(&self, handle: &ElementHandle) -> E2eResult<usize> {
        let id = handle
            .id()
            .strip_prefix('n')
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|id| *id < self.nodes.len())
            .ok_or_else(|| E2eError::driver(format!("no such element: {}", handle)))?;
        let node = &self.nodes[id];
        if node.removed || node.doc != self.current {
            return Err(E2eError::driver(format!("stale element reference: {}", handle)));
        }
        Ok(id)
    }

    fn is_ancestor(&self, ancestor: usize, mut id: usize) -> bool {
        while let Some(parent) = self.nodes[id].parent {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    fn live(&self, id: usize, locator: &Locator) -> bool {
        let node = &self.nodes[id];
        !node.removed && node.doc == self.current && node.locators.contains(locator)
    }

    fn run_click(&mut self, id: usize) {
        if let Some(effect) = self.nodes[id].on_click.clone() {
            effect(self);
        }
    }

    fn run_input(&mut self, id: usize) {
        if let Some(effect) = self.nodes[id].on_input.clone() {
            effect(self, id);
        }
    }
}

/// Cloneable handle on one shared in-memory browser
#[derive(Clone)]
pub struct FakeDriver {
    dom: Arc<Mutex<Dom>>,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            dom: Arc::new(Mutex::new(Dom {
                nodes: Vec::new(),
                docs: vec![Doc {
                    parent: None,
                    frame_nodes: Vec::new(),
                }],
                current: TOP,
                url: "about:blank".to_string(),
                calls: Vec::new(),
                broken: false,
                fail_capture: false,
                on_goto: None,
            })),
        }
    }

    /// Add `node` at the root of document `doc`
    pub fn add(&self, doc: usize, mut node: Node) -> usize {
        let mut dom = self.dom.lock();
        node.doc = doc;
        node.parent = None;
        dom.nodes.push(node);
        dom.nodes.len() - 1
    }

    /// Add `node` below `parent`, in the parent's document
    pub fn add_child(&self, parent: usize, mut node: Node) -> usize {
        let mut dom = self.dom.lock();
        node.doc = dom.nodes[parent].doc;
        node.parent = Some(parent);
        dom.nodes.push(node);
        dom.nodes.len() - 1
    }

    /// Add an iframe to `doc` and return the document inside it
    pub fn add_frame(&self, doc: usize) -> usize {
        let mut dom = self.dom.lock();
        let inner = dom.docs.len();
        dom.docs.push(Doc {
            parent: Some(doc),
            frame_nodes: Vec::new(),
        });

        let mut node = Node::new("iframe").css("iframe");
        node.doc = doc;
        node.frame = Some(inner);
        dom.nodes.push(node);
        let id = dom.nodes.len() - 1;
        dom.docs[doc].frame_nodes.push(id);
        inner
    }

    pub fn on_click(&self, id: usize, effect: impl Fn(&mut Dom) + Send + Sync + 'static) {
        self.dom.lock().nodes[id].on_click = Some(Arc::new(effect));
    }

    pub fn on_input(&self, id: usize, effect: impl Fn(&mut Dom, usize) + Send + Sync + 'static) {
        self.dom.lock().nodes[id].on_input = Some(Arc::new(effect));
    }

    pub fn on_goto(&self, effect: impl Fn(&mut Dom, &str) + Send + Sync + 'static) {
        self.dom.lock().on_goto = Some(Arc::new(effect));
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut Dom) -> T) -> T {
        f(&mut *self.dom.lock())
    }

    pub fn handle(id: usize) -> ElementHandle {
        Dom::handle(id)
    }

    pub fn value(&self, id: usize) -> String {
        self.dom.lock().nodes[id].value.clone()
    }

    pub fn text_of(&self, id: usize) -> String {
        self.dom.lock().nodes[id].text.clone()
    }

    pub fn current_doc(&self) -> usize {
        self.dom.lock().current
    }

    pub fn url(&self) -> String {
        self.dom.lock().url.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.dom.lock().calls.clone()
    }

    /// Calls whose operation name is `op`
    pub fn calls_to(&self, op: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c == op || c.starts_with(&format!("{} ", op)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.dom.lock().calls.clear();
    }

    fn record(dom: &mut Dom, call: String) {
        dom.calls.push(call);
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("goto {}", url));
        dom.url = url.to_string();
        dom.current = TOP;
        if let Some(effect) = dom.on_goto.clone() {
            effect(&mut *dom, url);
        }
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, "current_url".to_string());
        Ok(dom.url.clone())
    }

    async fn page_source(&self) -> E2eResult<String> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, "page_source".to_string());
        if dom.fail_capture {
            return Err(E2eError::driver("page source unavailable"));
        }
        Ok(format!("<html><!-- {} nodes --></html>", dom.nodes.len()))
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, "screenshot".to_string());
        if dom.fail_capture {
            return Err(E2eError::driver("screenshot unavailable"));
        }
        Ok(b"\x89PNG\r\n\x1a\n".to_vec())
    }

    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<ElementHandle>> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("find_all {}", locator));
        if dom.broken {
            return Err(E2eError::driver("invalid session id"));
        }
        Ok((0..dom.nodes.len())
            .filter(|id| dom.live(*id, locator))
            .map(Dom::handle)
            .collect())
    }

    async fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> E2eResult<Vec<ElementHandle>> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("find_within {} {}", parent, locator));
        if dom.broken {
            return Err(E2eError::driver("invalid session id"));
        }
        let parent = dom.resolve(parent)?;

        // Ancestor axis: nearest matching ancestor first
        if locator.expr.starts_with("ancestor::") {
            let mut found = Vec::new();
            let mut id = parent;
            while let Some(up) = dom.nodes[id].parent {
                if dom.live(up, locator) {
                    found.push(Dom::handle(up));
                }
                id = up;
            }
            return Ok(found);
        }

        Ok((0..dom.nodes.len())
            .filter(|id| dom.live(*id, locator) && dom.is_ancestor(parent, *id))
            .map(Dom::handle)
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> E2eResult<()> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("click {}", element));
        let id = dom.resolve(element)?;
        if dom.nodes[id].native_click_fails {
            return Err(E2eError::driver("element click intercepted"));
        }
        dom.run_click(id);
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> E2eResult<()> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("clear {}", element));
        let id = dom.resolve(element)?;
        dom.nodes[id].value.clear();
        dom.run_input(id);
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> E2eResult<()> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("send_keys {} {:?}", element, text));
        let id = dom.resolve(element)?;
        // WebDriver special keys live in the private use area
        let typed: String = text
            .chars()
            .filter(|c| !('\u{E000}'..='\u{F8FF}').contains(c))
            .collect();
        dom.nodes[id].value.push_str(&typed);
        dom.run_input(id);
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> E2eResult<String> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("text {}", element));
        let id = dom.resolve(element)?;
        Ok(dom.nodes[id].text.clone())
    }

    async fn attr(&self, element: &ElementHandle, name: &str) -> E2eResult<Option<String>> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("attr {} {}", element, name));
        let id = dom.resolve(element)?;
        let node = &dom.nodes[id];
        if name == "value" {
            return Ok(Some(node.value.clone()));
        }
        Ok(node.attrs.get(name).cloned())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> E2eResult<bool> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("is_displayed {}", element));
        let id = dom.resolve(element)?;
        Ok(dom.nodes[id].displayed)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> E2eResult<bool> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("is_enabled {}", element));
        let id = dom.resolve(element)?;
        Ok(dom.nodes[id].enabled)
    }

    async fn execute(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> E2eResult<serde_json::Value> {
        let mut dom = self.dom.lock();
        let target = args.first().map(|a| a.to_string()).unwrap_or_default();
        let ids = args
            .iter()
            .map(|a| dom.resolve(a))
            .collect::<E2eResult<Vec<_>>>();

        if script.contains(".click()") {
            Self::record(&mut dom, format!("execute click {}", target));
            let ids = ids?;
            if let Some(id) = ids.first() {
                dom.run_click(*id);
            }
        } else if script.contains("scrollIntoView") {
            Self::record(&mut dom, format!("execute scroll {}", target));
            ids?;
        } else {
            Self::record(&mut dom, format!("execute {}", script));
        }
        Ok(serde_json::Value::Null)
    }

    async fn enter_frame(&self, index: u16) -> E2eResult<()> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, format!("enter_frame {}", index));
        let current = dom.current;
        let frames: Vec<usize> = dom.docs[current]
            .frame_nodes
            .iter()
            .copied()
            .filter(|id| !dom.nodes[*id].removed)
            .collect();
        let node = frames
            .get(index as usize)
            .copied()
            .ok_or_else(|| E2eError::driver(format!("no such frame: {}", index)))?;
        dom.current = dom.nodes[node].frame.unwrap_or(current);
        Ok(())
    }

    async fn enter_parent_frame(&self) -> E2eResult<()> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, "enter_parent_frame".to_string());
        let current = dom.current;
        dom.current = dom.docs[current].parent.unwrap_or(TOP);
        Ok(())
    }

    async fn enter_default_content(&self) -> E2eResult<()> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, "enter_default_content".to_string());
        dom.current = TOP;
        Ok(())
    }

    async fn quit(&self) -> E2eResult<()> {
        let mut dom = self.dom.lock();
        Self::record(&mut dom, "quit".to_string());
        Ok(())
    }
}
