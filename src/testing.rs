//! In-memory page and virtual clock for driving the motion layer in tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::page::{
    AudioOutput, EntriesHandler, EventInfo, Handler, Intersection, ObserverOptions, Page, Rect,
    Target,
};
use crate::timers::Timers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FakeNode(pub usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    style: BTreeMap<String, String>,
    css_text: String,
    parent: Option<usize>,
    rect: Rect,
    client: (f64, f64),
    complete: bool,
    detached: bool,
}

struct Listener {
    target: Target<FakeNode>,
    event: String,
    handler: Handler,
}

pub struct FakePage {
    nodes: RefCell<Vec<NodeData>>,
    listeners: RefCell<Vec<Listener>>,
    observed: RefCell<Vec<FakeNode>>,
    observer_options: RefCell<Option<ObserverOptions>>,
    on_entries: RefCell<Option<EntriesHandler<FakeNode>>>,
    viewport_height: Cell<f64>,
    hidden: Cell<bool>,
    audio_available: Cell<bool>,
    tones: Rc<RefCell<Vec<(f32, f64)>>>,
    fail_create: Cell<bool>,
    fail_listen: Cell<bool>,
    fail_head: Cell<bool>,
}

pub const HEAD: FakeNode = FakeNode(0);
pub const BODY: FakeNode = FakeNode(1);

impl FakePage {
    pub fn new() -> Self {
        let head = NodeData { tag: "head".into(), ..Default::default() };
        let body = NodeData { tag: "body".into(), ..Default::default() };
        Self {
            nodes: RefCell::new(vec![head, body]),
            listeners: RefCell::new(Vec::new()),
            observed: RefCell::new(Vec::new()),
            observer_options: RefCell::new(None),
            on_entries: RefCell::new(None),
            viewport_height: Cell::new(800.0),
            hidden: Cell::new(false),
            audio_available: Cell::new(true),
            tones: Rc::new(RefCell::new(Vec::new())),
            fail_create: Cell::new(false),
            fail_listen: Cell::new(false),
            fail_head: Cell::new(false),
        }
    }

    /// Build an element under `parent` (the body when `None`).
    pub fn element(&self, tag: &str, classes: &[&str], parent: Option<FakeNode>) -> FakeNode {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent: Some(parent.unwrap_or(BODY).0),
            complete: true,
            ..Default::default()
        });
        FakeNode(nodes.len() - 1)
    }

    pub fn set_attr(&self, node: FakeNode, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0].attrs.insert(name.to_string(), value.to_string());
    }

    pub fn set_text_raw(&self, node: FakeNode, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    pub fn set_rect(&self, node: FakeNode, rect: Rect) {
        self.nodes.borrow_mut()[node.0].rect = rect;
    }

    pub fn set_client_size(&self, node: FakeNode, width: f64, height: f64) {
        self.nodes.borrow_mut()[node.0].client = (width, height);
    }

    pub fn set_complete(&self, node: FakeNode, complete: bool) {
        self.nodes.borrow_mut()[node.0].complete = complete;
    }

    pub fn set_viewport_height(&self, height: f64) {
        self.viewport_height.set(height);
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
    }

    pub fn set_audio_available(&self, available: bool) {
        self.audio_available.set(available);
    }

    pub fn fail_element_creation(&self) {
        self.fail_create.set(true);
    }

    pub fn fail_listeners(&self) {
        self.fail_listen.set(true);
    }

    pub fn fail_head_appends(&self) {
        self.fail_head.set(true);
    }

    pub fn text_of(&self, node: FakeNode) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    pub fn style_of(&self, node: FakeNode, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].style.get(property).cloned()
    }

    pub fn css_text_of(&self, node: FakeNode) -> String {
        self.nodes.borrow()[node.0].css_text.clone()
    }

    pub fn classes_of(&self, node: FakeNode) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    pub fn tag_of(&self, node: FakeNode) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub fn children_of(&self, node: FakeNode) -> Vec<FakeNode> {
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent == Some(node.0) && !n.detached)
            .map(|(i, _)| FakeNode(i))
            .collect()
    }

    pub fn is_attached(&self, node: FakeNode) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(node.0);
        while let Some(i) = current {
            if nodes[i].detached {
                return false;
            }
            if i == HEAD.0 || i == BODY.0 {
                return true;
            }
            current = nodes[i].parent;
        }
        false
    }

    pub fn observed(&self) -> Vec<FakeNode> {
        self.observed.borrow().clone()
    }

    pub fn observer_options(&self) -> Option<ObserverOptions> {
        self.observer_options.borrow().clone()
    }

    pub fn tones(&self) -> Vec<(f32, f64)> {
        self.tones.borrow().clone()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.borrow().iter().filter(|l| l.event == event).count()
    }

    /// Dispatch `event` to every listener registered on `target`.
    pub fn fire(&self, target: Target<FakeNode>, event: &str, info: &EventInfo) {
        let mut taken = std::mem::take(&mut *self.listeners.borrow_mut());
        for listener in taken.iter_mut() {
            if listener.target == target && listener.event == event {
                (listener.handler)(info);
            }
        }
        let mut current = self.listeners.borrow_mut();
        taken.append(&mut current);
        *current = taken;
    }

    /// Deliver one observer batch.
    pub fn intersect(&self, entries: &[(FakeNode, bool)]) {
        let Some(mut handler) = self.on_entries.borrow_mut().take() else {
            return;
        };
        handler(
            entries
                .iter()
                .map(|&(target, is_intersecting)| Intersection { target, is_intersecting })
                .collect(),
        );
        *self.on_entries.borrow_mut() = Some(handler);
    }

    fn matches(&self, index: usize, selector: &str) -> bool {
        let nodes = self.nodes.borrow();
        let mut parts = selector.split_whitespace().rev();
        let Some(last) = parts.next() else {
            return false;
        };
        if !compound_matches(&nodes[index], last) {
            return false;
        }
        let mut current = nodes[index].parent;
        for part in parts {
            loop {
                let Some(i) = current else {
                    return false;
                };
                current = nodes[i].parent;
                if compound_matches(&nodes[i], part) {
                    break;
                }
            }
        }
        true
    }

    fn is_descendant(&self, index: usize, ancestor: usize) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = nodes[index].parent;
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = nodes[i].parent;
        }
        false
    }

    fn len(&self) -> usize {
        self.nodes.borrow().len()
    }
}

/// Matches selectors of the form `tag.class[attr]#id`, any part optional.
fn compound_matches(node: &NodeData, compound: &str) -> bool {
    let mut rest = compound;
    let tag_end = rest.find(['.', '[', '#']).unwrap_or(rest.len());
    if tag_end > 0 && node.tag != rest[..tag_end] {
        return false;
    }
    rest = &rest[tag_end..];
    while !rest.is_empty() {
        let (kind, body) = rest.split_at(1);
        let end = match kind {
            "[" => body.find(']').map(|i| i + 1).unwrap_or(body.len()),
            _ => body.find(['.', '[', '#']).unwrap_or(body.len()),
        };
        let token = body[..end].trim_end_matches(']');
        let ok = match kind {
            "." => node.classes.iter().any(|c| c == token),
            "#" => node.attrs.get("id").map(String::as_str) == Some(token),
            "[" => node.attrs.contains_key(token),
            _ => false,
        };
        if !ok {
            return false;
        }
        rest = &body[end..];
    }
    true
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

/// Tones land in a log shared with the page.
pub struct RecordingAudio {
    log: Rc<RefCell<Vec<(f32, f64)>>>,
}

impl AudioOutput for RecordingAudio {
    fn tone(&self, frequency: f32, duration: f64) -> Result<()> {
        self.log.borrow_mut().push((frequency, duration));
        Ok(())
    }
}

impl Page for FakePage {
    type Node = FakeNode;
    type Audio = RecordingAudio;

    fn query_all(&self, selector: &str) -> Vec<FakeNode> {
        (0..self.len())
            .filter(|&i| self.is_attached(FakeNode(i)))
            .filter(|&i| selector.split(',').any(|s| self.matches(i, s.trim())))
            .map(FakeNode)
            .collect()
    }

    fn query_within(&self, scope: &FakeNode, selector: &str) -> Option<FakeNode> {
        (0..self.len())
            .filter(|&i| self.is_descendant(i, scope.0) && self.is_attached(FakeNode(i)))
            .find(|&i| selector.split(',').any(|s| self.matches(i, s.trim())))
            .map(FakeNode)
    }

    fn attribute(&self, node: &FakeNode, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn text(&self, node: &FakeNode) -> String {
        self.text_of(*node)
    }

    fn set_text(&self, node: &FakeNode, text: &str) {
        self.set_text_raw(*node, text);
    }

    fn has_class(&self, node: &FakeNode, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &FakeNode, class: &str) {
        if !self.has_class(node, class) {
            self.nodes.borrow_mut()[node.0].classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &FakeNode, class: &str) {
        self.nodes.borrow_mut()[node.0].classes.retain(|c| c != class);
    }

    fn set_style(&self, node: &FakeNode, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        if value.is_empty() {
            nodes[node.0].style.remove(property);
        } else {
            nodes[node.0].style.insert(property.to_string(), value.to_string());
        }
    }

    fn set_css_text(&self, node: &FakeNode, css: &str) {
        self.nodes.borrow_mut()[node.0].css_text = css.to_string();
    }

    fn create_element(&self, tag: &str) -> Result<FakeNode> {
        if self.fail_create.get() {
            return Err(Error::Js(format!("cannot create <{}>", tag)));
        }
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData { tag: tag.to_string(), ..Default::default() });
        Ok(FakeNode(nodes.len() - 1))
    }

    fn append_child(&self, parent: &FakeNode, child: &FakeNode) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent.0);
        nodes[child.0].detached = false;
        Ok(())
    }

    fn append_to_head(&self, node: &FakeNode) -> Result<()> {
        if self.fail_head.get() {
            return Err(Error::MissingElement("head".into()));
        }
        self.append_child(&HEAD, node)
    }

    fn append_to_body(&self, node: &FakeNode) -> Result<()> {
        self.append_child(&BODY, node)
    }

    fn remove(&self, node: &FakeNode) {
        self.nodes.borrow_mut()[node.0].detached = true;
    }

    fn parent(&self, node: &FakeNode) -> Option<FakeNode> {
        self.nodes.borrow()[node.0].parent.map(FakeNode)
    }

    fn bounding_rect(&self, node: &FakeNode) -> Rect {
        self.nodes.borrow()[node.0].rect
    }

    fn client_size(&self, node: &FakeNode) -> (f64, f64) {
        self.nodes.borrow()[node.0].client
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height.get()
    }

    fn document_hidden(&self) -> bool {
        self.hidden.get()
    }

    fn image_complete(&self, node: &FakeNode) -> bool {
        let nodes = self.nodes.borrow();
        nodes[node.0].tag == "img" && nodes[node.0].complete
    }

    fn heap_used(&self) -> Option<f64> {
        Some(8.0 * 1_048_576.0)
    }

    fn listen(&self, target: Target<FakeNode>, event: &str, handler: Handler) -> Result<()> {
        if self.fail_listen.get() {
            return Err(Error::Js(format!("cannot listen for {}", event)));
        }
        self.listeners.borrow_mut().push(Listener {
            target,
            event: event.to_string(),
            handler,
        });
        Ok(())
    }

    fn observe(
        &self,
        targets: &[FakeNode],
        options: &ObserverOptions,
        on_entries: EntriesHandler<FakeNode>,
    ) -> Result<()> {
        self.observed.borrow_mut().extend_from_slice(targets);
        *self.observer_options.borrow_mut() = Some(options.clone());
        *self.on_entries.borrow_mut() = Some(on_entries);
        Ok(())
    }

    fn open_audio(&self) -> Result<RecordingAudio> {
        if !self.audio_available.get() {
            return Err(Error::AudioUnavailable("no AudioContext in this page".into()));
        }
        Ok(RecordingAudio { log: self.tones.clone() })
    }

    fn teardown(&self) {
        self.listeners.borrow_mut().clear();
        self.observed.borrow_mut().clear();
        *self.on_entries.borrow_mut() = None;
    }
}

enum Task {
    Once(Box<dyn FnOnce()>),
    Every(u32, Box<dyn FnMut() -> ControlFlow<()>>),
}

struct Scheduled {
    due: f64,
    seq: u64,
    task: Task,
}

/// Deterministic stand-in for the browser's event loop. Nothing runs until
/// the test calls [`VirtualClock::advance`].
#[derive(Default)]
pub struct VirtualClock {
    now: Cell<f64>,
    seq: Cell<u64>,
    queue: RefCell<Vec<Scheduled>>,
}

const FRAME_MS: u32 = 16;

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn schedule(&self, delay: u32, task: Task) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.queue.borrow_mut().push(Scheduled {
            due: self.now.get() + f64::from(delay),
            seq,
            task,
        });
    }

    /// Run everything due within the next `ms` milliseconds, in due order.
    pub fn advance(&self, ms: u32) {
        let until = self.now.get() + f64::from(ms);
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let earliest = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.due <= until)
                    .min_by(|(_, a), (_, b)| {
                        a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq))
                    })
                    .map(|(i, _)| i);
                earliest.map(|i| queue.swap_remove(i))
            };
            let Some(scheduled) = next else {
                break;
            };
            self.now.set(scheduled.due);
            match scheduled.task {
                Task::Once(task) => task(),
                Task::Every(ms, mut task) => {
                    if task().is_continue() {
                        self.schedule(ms, Task::Every(ms, task));
                    }
                }
            }
        }
        self.now.set(until);
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Timers for VirtualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn after(&self, ms: u32, task: Box<dyn FnOnce()>) {
        self.schedule(ms, Task::Once(task));
    }

    fn every(&self, ms: u32, task: Box<dyn FnMut() -> ControlFlow<()>>) {
        // browsers clamp zero-delay intervals
        let ms = ms.max(1);
        self.schedule(ms, Task::Every(ms, task));
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) {
        self.schedule(FRAME_MS, Task::Once(task));
    }
}
