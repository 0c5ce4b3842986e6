//=========================================================================
// Drag Engine
//
// Main entry point: turns pointer input into drag sessions.
//
// Architecture:
// ```text
//     DragEngineBuilder  ──build()──>  DragEngine  ──handle_pointer()──>  PointerOutcome
//         │                               │
//         ├─ with_default_emitter()       ├─ registry   (ElementId → DragConfig)
//         ├─ with_class_names()           ├─ EventBus   (Start / Drag / Drop)
//         └─ with_notifiers()             ├─ NotifierRegistry (setup / teardown)
//                                         └─ DragSession (at most one)
// ```
//
// Lifecycle of one session:
// ```text
//   down ─> Start(before) ─┬─ prevented ─> reject ─> Start(after)
//                          └─ default ───> setup notifiers ─> Start(after)
//   move ─> Drag(before) ─> move element + relatives ─> Drag(after) ─> progress
//   up   ─> teardown notifiers ─> clear ─> Drop(before) ─> cleanup ─> Drop(after) ─> fulfil
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::completion::{DragCompletion, DropReport};
use crate::core::config::{attributes, ClassNames, DragConfig, Draggable, DropzoneConfig, EmitterName};
use crate::core::dom::{ElementId, ElementTree, Selector};
use crate::core::error::DragError;
use crate::core::event_bus::{DragEvent, DragPhase, EventBus, Namespace, SubscriptionId};
use crate::core::geometry::Point;
use crate::core::input::{ListenerKind, ListenerSet, PointerEvent};
use crate::core::notifier::{NotifierError, NotifierHandle, NotifierPhase, NotifierRegistry};
use crate::core::session::{delegation, ConstraintRegion, DragSession, Relative, SessionState};

//=== DragEngineBuilder ===================================================

/// Builder for configuring and constructing a [`DragEngine`].
///
/// # Default Values
///
/// - **Default emitter**: `"UI"`
/// - **Class names**: see [`ClassNames::default`]
/// - **Notifiers**: a fresh, empty registry
///
/// # Examples
///
/// ```
/// use drag_engine::core::notifier::NotifierRegistry;
/// use drag_engine::DragEngine;
///
/// let notifiers = NotifierRegistry::new();
/// let mut engine = DragEngine::builder()
///     .with_default_emitter("Board")
///     .with_notifiers(notifiers.clone())
///     .build();
/// engine.init();
///
/// assert!(engine.is_initialised());
/// ```
pub struct DragEngineBuilder {
    default_emitter: EmitterName,
    class_names: ClassNames,
    notifiers: Option<NotifierRegistry>,
}

impl DragEngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            default_emitter: EmitterName::default(),
            class_names: ClassNames::default(),
            notifiers: None,
        }
    }

    /// Sets the namespace used when neither the element nor a `Start`
    /// listener names one.
    ///
    /// Default: `"UI"`
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or contains non-word characters.
    pub fn with_default_emitter(mut self, name: &str) -> Self {
        match EmitterName::new(name) {
            Ok(emitter) => self.default_emitter = emitter,
            Err(err) => panic!("Default emitter must be a word: {}", err),
        }
        self
    }

    /// Overrides the CSS classes toggled on dragged elements.
    pub fn with_class_names(mut self, class_names: ClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    /// Shares an existing notifier registry with the engine.
    pub fn with_notifiers(mut self, notifiers: NotifierRegistry) -> Self {
        self.notifiers = Some(notifiers);
        self
    }

    /// Builds the engine. Call [`DragEngine::init`] before feeding input.
    pub fn build(self) -> DragEngine {
        info!(target: "drag", "Building drag engine (default emitter: {})", self.default_emitter);

        DragEngine {
            default_emitter: self.default_emitter,
            classes: self.class_names,
            notifiers: self.notifiers.unwrap_or_default(),
            bus: EventBus::new(),
            registry: HashMap::new(),
            listeners: ListenerSet::new(),
            initialised: false,
            active: None,
        }
    }
}

impl Default for DragEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== PointerOutcome ======================================================

/// What the engine did with one pointer event.
#[derive(Debug, Clone)]
pub enum PointerOutcome {
    /// Not relevant to the engine (no draggable under the pointer, a drag
    /// already running, the engine not initialised, ...).
    Ignored,

    /// A session started.
    Started(DragCompletion),

    /// A `Start` listener prevented the session.
    Rejected(DragCompletion),

    /// The dragged element moved to this page position.
    Moved(Point),

    /// A move without coordinates; nothing happened.
    Skipped,

    /// The session ended.
    Dropped(DropReport),
}

impl PointerOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, PointerOutcome::Ignored)
    }

    /// Completion handle of a session that started or was rejected.
    pub fn completion(&self) -> Option<&DragCompletion> {
        match self {
            PointerOutcome::Started(completion) | PointerOutcome::Rejected(completion) => {
                Some(completion)
            }
            _ => None,
        }
    }
}

//=== DragEngine ==========================================================

/// Session plus the event payload that travels through its phases.
struct ActiveDrag {
    session: DragSession,
    event: DragEvent,
}

/// Pointer-driven drag engine.
///
/// Create via [`DragEngine::builder`]. The engine is single-threaded: the
/// host feeds every pointer event through [`DragEngine::handle_pointer`]
/// together with mutable access to its element tree.
pub struct DragEngine {
    default_emitter: EmitterName,
    classes: ClassNames,
    notifiers: NotifierRegistry,
    bus: EventBus,
    registry: HashMap<ElementId, DragConfig>,
    listeners: ListenerSet,
    initialised: bool,
    active: Option<ActiveDrag>,
}

impl DragEngine {
    pub fn builder() -> DragEngineBuilder {
        DragEngineBuilder::new()
    }

    //--- Initialization ---------------------------------------------------

    /// Installs the pointer-down listener. Later calls do nothing.
    pub fn init(&mut self) {
        if self.initialised {
            debug!(target: "drag", "init() called again; already initialised");
            return;
        }
        self.listeners.install(ListenerKind::PointerDown);
        self.initialised = true;
        info!(target: "drag", "Drag engine initialised");
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    //--- Notifiers --------------------------------------------------------

    /// Registers a setup or teardown notifier.
    pub fn notify<F>(&self, callback: F, phase: NotifierPhase) -> NotifierHandle
    where
        F: FnMut(&DragEvent, &DragSession) -> Result<(), NotifierError> + 'static,
    {
        self.notifiers.notify(callback, phase)
    }

    pub fn notifiers(&self) -> &NotifierRegistry {
        &self.notifiers
    }

    //--- Registration -----------------------------------------------------

    /// Makes `element` draggable (or a delegating container) with `config`.
    ///
    /// Replaces any previous registration of the element.
    pub fn register(&mut self, element: ElementId, config: DragConfig) {
        debug!(target: "drag", "register {:?}: {:?}", element, config.draggable);
        self.registry.insert(element, config);
    }

    /// Registers `scope` and every descendant carrying `dd-draggable`,
    /// reading their declarative attributes once.
    ///
    /// An element with a malformed declaration is logged and skipped; the
    /// rest of the scope is still registered.
    ///
    /// Returns the number of registered elements.
    pub fn register_from_tree<T: ElementTree + ?Sized>(
        &mut self,
        tree: &T,
        scope: ElementId,
    ) -> Result<usize, DragError> {
        let mut candidates = vec![scope];
        candidates.extend(tree.query_all(scope, &draggable_selector()?));

        let mut registered = 0;
        for element in candidates {
            match DragConfig::from_attributes(tree, element) {
                Ok(Some(config)) => {
                    self.register(element, config);
                    registered += 1;
                }
                Ok(None) => {}
                Err(err) => warn!(target: "drag", "skipping {:?}: {}", element, err),
            }
        }

        info!(target: "drag", "registered {} draggable(s) from attributes", registered);
        Ok(registered)
    }

    /// Writes `config` onto `element` as declarative attributes and
    /// registers it.
    pub fn register_with_attributes<T: ElementTree + ?Sized>(
        &mut self,
        tree: &mut T,
        element: ElementId,
        config: DragConfig,
    ) {
        for (name, value) in config.to_attributes() {
            tree.set_attribute(element, name, &value);
        }
        self.register(element, config);
    }

    /// Removes a registration. A running session is not affected.
    pub fn unregister(&mut self, element: ElementId) -> Option<DragConfig> {
        self.registry.remove(&element)
    }

    pub fn config(&self, element: ElementId) -> Option<&DragConfig> {
        self.registry.get(&element)
    }

    /// Declares `element` a drop zone.
    pub fn register_dropzone<T: ElementTree + ?Sized>(
        &mut self,
        tree: &mut T,
        element: ElementId,
        config: &DropzoneConfig,
    ) {
        tree.set_attribute(element, attributes::DROPZONE_TARGET, &config.to_string());
        debug!(target: "drag", "dropzone {:?}: {}", element, config);
    }

    //--- Event Bus --------------------------------------------------------

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn on_before<F>(&mut self, phase: DragPhase, namespace: Namespace, listener: F) -> SubscriptionId
    where
        F: FnMut(&mut DragEvent) + 'static,
    {
        self.bus.subscribe_before(phase, namespace, listener)
    }

    pub fn on_after<F>(&mut self, phase: DragPhase, namespace: Namespace, listener: F) -> SubscriptionId
    where
        F: FnMut(&DragEvent) + 'static,
    {
        self.bus.subscribe_after(phase, namespace, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    //--- Queries ----------------------------------------------------------

    pub fn session(&self) -> Option<&DragSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    pub fn state(&self) -> SessionState {
        self.session().map_or(SessionState::Idle, DragSession::state)
    }

    /// Completion handle of the running session.
    pub fn completion(&self) -> Option<&DragCompletion> {
        self.active.as_ref().map(|active| active.event.completion())
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.classes
    }

    pub fn default_emitter(&self) -> &EmitterName {
        &self.default_emitter
    }

    //--- Input ------------------------------------------------------------

    /// Feeds one pointer event into the engine.
    ///
    /// Errors are reported after the lifecycle step completed: a failing
    /// teardown notifier still lets the session drop.
    pub fn handle_pointer<T: ElementTree + ?Sized>(
        &mut self,
        tree: &mut T,
        event: PointerEvent,
    ) -> Result<PointerOutcome, DragError> {
        if !self.initialised {
            trace!(target: "drag", "ignoring {:?}: engine not initialised", event.kind);
            return Ok(PointerOutcome::Ignored);
        }

        if event.kind.is_press() {
            if self.active.is_some() {
                debug!(target: "drag", "pointer-down ignored: a drag is already running");
                return Ok(PointerOutcome::Ignored);
            }
            return self.start(tree, &event);
        }

        if self.active.is_none() {
            return Ok(PointerOutcome::Ignored);
        }

        if event.kind.is_move() {
            if !self.listeners.is_installed(ListenerKind::PointerMove) {
                return Ok(PointerOutcome::Ignored);
            }
            let Some(client) = event.position else {
                trace!(target: "drag", "move without coordinates skipped");
                return Ok(PointerOutcome::Skipped);
            };
            if event.buttons.is_empty() {
                debug!(target: "drag", "buttons released outside the window; synthesizing up");
                return self.settle(tree, None);
            }
            return Ok(self.tick(tree, client, &event));
        }

        if !self.listeners.is_installed(ListenerKind::PointerUp) {
            return Ok(PointerOutcome::Ignored);
        }
        self.settle(tree, event.position)
    }

    //=== Start ============================================================

    fn start<T: ElementTree + ?Sized>(
        &mut self,
        tree: &mut T,
        input: &PointerEvent,
    ) -> Result<PointerOutcome, DragError> {
        let (Some(target), Some(client)) = (input.target, input.position) else {
            trace!(target: "drag", "pointer-down without target or coordinates");
            return Ok(PointerOutcome::Ignored);
        };

        //--- 1. Find the draggable ---------------------------------------
        let Some((candidate, config)) = self.registered_ancestor(tree, target) else {
            return Ok(PointerOutcome::Ignored);
        };

        let (drag_node, container, effective) = match &config.draggable {
            Draggable::Direct => (candidate, None, config.clone()),
            Draggable::Delegated(selector) => {
                match delegation::resolve_delegate(tree, candidate, selector, target) {
                    Some(delegate) => {
                        let effective = config.for_delegate(tree, delegate);
                        (delegate, Some(candidate), effective)
                    }
                    None => {
                        trace!(target: "drag", "no delegate of {:?} under pointer", candidate);
                        return Ok(PointerOutcome::Ignored);
                    }
                }
            }
        };

        //--- 2. Handle check ---------------------------------------------
        if let Some(handle) = &effective.handle {
            let inside = tree
                .query_all(drag_node, handle)
                .into_iter()
                .any(|grip| tree.contains(grip, target));
            if !inside {
                debug!(target: "drag", "pointer-down outside handle {} of {:?}", handle, drag_node);
                return Ok(PointerOutcome::Ignored);
            }
        }

        //--- 3. Arm --------------------------------------------------------
        let emitter = effective
            .emitter
            .clone()
            .unwrap_or_else(|| self.default_emitter.clone());
        let viewport = tree.viewport();
        let drop_effect = effective.effect_allowed.resolve(input.modifiers);

        let mut session = DragSession::armed(drag_node, target, effective, emitter.clone());
        session.container = container;
        session.pointer_origin = client + viewport.scroll;
        session.pointer = client;
        session.window_scroll = viewport.scroll;
        session.drop_effect = drop_effect;
        session.origin = tree.position(drag_node).unwrap_or(Point::ZERO);
        session.position = session.origin;

        let Some(completion) = session.deferred.as_ref().map(|deferred| deferred.completion()) else {
            return Ok(PointerOutcome::Ignored);
        };

        if container.is_some() {
            session.transported = delegation::mark(tree, drag_node, &config, &self.classes.delegated);
        }

        let mut event = DragEvent::new(DragPhase::Start, drag_node, completion.clone());
        event.emitter = emitter;
        event.current_target = container;
        event.source_target = target;
        event.pointer_origin = session.pointer_origin;
        event.pointer = client;
        event.position = session.origin;
        event.drop_effect = drop_effect;
        event.modifiers = input.modifiers;

        debug!(target: "drag", "armed {:?} (source {:?}, container {:?})", drag_node, target, container);

        //--- 4. Start(before) ---------------------------------------------
        self.bus.emit_before(&mut event);

        if event.is_prevented() {
            self.reject(tree, session, &event);
            return Ok(PointerOutcome::Rejected(completion));
        }

        //--- 5. Default behaviour -----------------------------------------
        if tree.position(drag_node).is_none() {
            warn!(target: "drag", "{:?} left the tree before the drag started", drag_node);
            self.restore_delegation(tree, &session);
            if let Some(deferred) = session.deferred.take() {
                deferred.reject();
            }
            return Err(DragError::DetachedElement(drag_node));
        }

        session.emitter = event.emitter.clone();
        let setup = self.initialize_drag(tree, &mut session, &mut event);

        //--- 6. Start(after) ----------------------------------------------
        self.bus.emit_after(&event);

        info!(
            target: "drag",
            "drag started on {:?} under {} ({} relative(s))",
            drag_node,
            session.emitter,
            session.relatives.len()
        );

        self.active = Some(ActiveDrag { session, event });

        match setup {
            Ok(()) => Ok(PointerOutcome::Started(completion)),
            Err(source) => Err(DragError::Notifier {
                phase: NotifierPhase::Setup,
                source,
            }),
        }
    }

    /// Nearest registered ancestor-or-self of `target`.
    fn registered_ancestor<T: ElementTree + ?Sized>(
        &self,
        tree: &T,
        target: ElementId,
    ) -> Option<(ElementId, DragConfig)> {
        std::iter::once(target)
            .chain(tree.ancestors(target))
            .find_map(|element| {
                self.registry
                    .get(&element)
                    .map(|config| (element, config.clone()))
            })
    }

    /// Default behaviour of `Start`: classes, constraint, placement,
    /// relatives, setup notifiers.
    fn initialize_drag<T: ElementTree + ?Sized>(
        &mut self,
        tree: &mut T,
        session: &mut DragSession,
        event: &mut DragEvent,
    ) -> Result<(), NotifierError> {
        let drag_node = session.drag_node;

        for element in tree.elements_with_class(&self.classes.master) {
            tree.remove_class(element, &self.classes.master);
        }

        session.inline_left = tree.inline_style(drag_node, "left");
        session.inline_top = tree.inline_style(drag_node, "top");
        session.constraint = ConstraintRegion::resolve(tree, &session.config.constraint, drag_node);

        self.listeners.install(ListenerKind::PointerMove);
        self.listeners.install(ListenerKind::PointerUp);

        for class in self.classes.drag_classes() {
            tree.add_class(drag_node, class);
        }

        let size = tree.size(drag_node);
        session.position = session
            .constraint
            .map_or(session.origin, |region| region.clamp(session.origin, size));
        tree.set_position(drag_node, session.position);

        //--- Relatives ---------------------------------------------------
        for element in std::mem::take(&mut event.relatives) {
            let Some(at) = tree.position(element) else {
                warn!(target: "drag", "relative {:?} is not in the tree; skipped", element);
                continue;
            };
            if element == drag_node {
                continue;
            }
            for class in self.classes.drag_classes() {
                tree.add_class(element, class);
            }
            session.relatives.push(Relative {
                element,
                offset: at - session.origin,
                inline_left: tree.inline_style(element, "left"),
                inline_top: tree.inline_style(element, "top"),
            });
        }

        if !session.relatives.is_empty() {
            tree.add_class(drag_node, &self.classes.master);
        }

        event.relatives = session.relatives.iter().map(|rel| rel.element).collect();
        event.position = session.position;
        session.state = SessionState::Dragging;

        self.notifiers.run(NotifierPhase::Setup, event, session)
    }

    /// Prevented behaviour of `Start`.
    fn reject<T: ElementTree + ?Sized>(&mut self, tree: &mut T, mut session: DragSession, event: &DragEvent) {
        debug!(target: "drag", "start of {:?} prevented", session.drag_node);

        if let Some(deferred) = session.deferred.take() {
            deferred.reject();
        }
        self.restore_delegation(tree, &session);
        self.listeners.uninstall(ListenerKind::PointerMove);
        self.listeners.uninstall(ListenerKind::PointerUp);

        self.bus.emit_after(event);
    }

    fn restore_delegation<T: ElementTree + ?Sized>(&self, tree: &mut T, session: &DragSession) {
        if session.container.is_some() {
            delegation::restore(tree, session.drag_node, &session.transported, &self.classes.delegated);
        }
    }

    //=== Drag =============================================================

    fn tick<T: ElementTree + ?Sized>(&mut self, tree: &mut T, client: Point, input: &PointerEvent) -> PointerOutcome {
        let Some(ActiveDrag { session, event }) = self.active.as_mut() else {
            return PointerOutcome::Ignored;
        };

        session.pointer = client;
        event.phase = DragPhase::Drag;
        event.pointer = client;
        event.modifiers = input.modifiers;
        event.clear_prevented();

        self.bus.emit_before(event);

        //--- Default behaviour -------------------------------------------
        if let Some(region) = session.constraint.as_mut() {
            region.refresh(tree);
        }

        let drag_node = session.drag_node;
        let unclamped = session.position_for(client, tree.viewport().scroll);
        let size = tree.size(drag_node);
        let position = session
            .constraint
            .map_or(unclamped, |region| region.clamp(unclamped, size));

        tree.set_position(drag_node, position);
        for relative in &session.relatives {
            tree.set_position(relative.element, position + relative.offset);
        }

        if !session.is_window_constrained() {
            tree.scroll_into_view(drag_node);
        }
        if let Some(ancestor) = session.constraint.and_then(|region| region.ancestor()) {
            tree.scroll_into_container_view(drag_node, ancestor);
        }

        session.position = position;
        event.position = position;

        trace!(target: "drag", "drag {:?} -> ({}, {})", drag_node, position.x, position.y);

        self.bus.emit_after(event);

        if let Some(deferred) = session.deferred.as_ref() {
            deferred.progress(position);
        }

        PointerOutcome::Moved(position)
    }

    //=== Drop =============================================================

    fn settle<T: ElementTree + ?Sized>(
        &mut self,
        tree: &mut T,
        client: Option<Point>,
    ) -> Result<PointerOutcome, DragError> {
        let Some(ActiveDrag { mut session, mut event }) = self.active.take() else {
            return Ok(PointerOutcome::Ignored);
        };

        session.state = SessionState::Settling;
        self.listeners.uninstall(ListenerKind::PointerMove);
        self.listeners.uninstall(ListenerKind::PointerUp);

        if let Some(client) = client {
            session.pointer = client;
        }
        event.phase = DragPhase::Drop;
        event.pointer = session.pointer;
        event.emitter = session.emitter.clone();
        event.clear_prevented();

        //--- Teardown notifiers, then clear -------------------------------
        let teardown = self.notifiers.run(NotifierPhase::Teardown, &event, &session);
        session.state = SessionState::Idle;

        //--- Drop ---------------------------------------------------------
        self.bus.emit_before(&mut event);

        let drag_node = session.drag_node;
        let mut cleaned = vec![drag_node];
        cleaned.extend(session.relatives.iter().map(|rel| rel.element));
        for element in cleaned {
            for class in self.classes.drag_classes() {
                tree.remove_class(element, class);
            }
            tree.remove_class(element, &self.classes.delegated);
        }
        for name in &session.transported {
            tree.remove_attribute(drag_node, name);
        }

        self.bus.emit_after(&event);

        let report = DropReport {
            position: session.position,
            pointer: session.pointer,
        };
        if let Some(deferred) = session.deferred.take() {
            deferred.fulfill(report);
        }

        info!(
            target: "drag",
            "dropped {:?} at ({}, {})",
            drag_node,
            report.position.x,
            report.position.y
        );

        match teardown {
            Ok(()) => Ok(PointerOutcome::Dropped(report)),
            Err(source) => Err(DragError::Notifier {
                phase: NotifierPhase::Teardown,
                source,
            }),
        }
    }
}

impl std::fmt::Debug for DragEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragEngine")
            .field("default_emitter", &self.default_emitter)
            .field("registered", &self.registry.len())
            .field("initialised", &self.initialised)
            .field("state", &self.state())
            .finish()
    }
}

//--- Helpers -------------------------------------------------------------

fn draggable_selector() -> Result<Selector, DragError> {
    Ok(Selector::parse(&format!("[{}]", attributes::DRAGGABLE))?)
}

//=========================================================================
// Unit Tests
//=========================================================================
