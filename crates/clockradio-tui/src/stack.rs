//! UiStack — modal navigation engine.
//!
//! Screens are constructed once and registered by id; the stack itself is an
//! ordered list of ids, bottom to top.  Each tick the app drives it through
//! input dispatch, update/resolution and (at its own cadence) drawing.

use std::collections::HashMap;

use ratatui::crossterm::event::KeyEvent;
use ratatui::Frame;
use tracing::debug;

use crate::action::{NavAction, ScreenId, ScreenKind};
use crate::alarm::AlarmEvent;
use crate::screen::Screen;

#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("screen {0} is already on the stack")]
    AlreadyOnStack(ScreenId),
    #[error("screen {0} is not on the stack")]
    NotOnStack(ScreenId),
    #[error("screen {0} is not registered")]
    Unregistered(ScreenId),
    #[error("cannot switch the top of an empty stack")]
    EmptyStack,
    #[error("screen {id} failed during update")]
    Screen {
        id: ScreenId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

pub struct UiStack<C> {
    screens: HashMap<ScreenId, Box<dyn Screen<C>>>,
    stack: Vec<ScreenId>,
}

impl<C> Default for UiStack<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> UiStack<C> {
    pub fn new() -> Self {
        Self {
            screens: HashMap::new(),
            stack: Vec::new(),
        }
    }

    pub fn register(&mut self, screen: Box<dyn Screen<C>>) {
        self.screens.insert(screen.id(), screen);
    }

    /// Active screen ids, bottom to top.
    pub fn ids(&self) -> &[ScreenId] {
        &self.stack
    }

    pub fn top(&self) -> Option<ScreenId> {
        self.stack.last().copied()
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.stack.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    pub fn push(&mut self, id: ScreenId, ctx: &mut C) -> Result<(), StackError> {
        if self.contains(id) {
            return Err(StackError::AlreadyOnStack(id));
        }
        let screen = self
            .screens
            .get_mut(&id)
            .ok_or(StackError::Unregistered(id))?;
        debug!("stack: push {}", id);
        self.stack.push(id);
        debug!("stack: {}.on_enter()", id);
        screen.on_enter(ctx);
        Ok(())
    }

    /// Pop screens from the top down to and including `target`, running each
    /// exit hook in pop order.
    pub fn pop_to(&mut self, target: ScreenId, ctx: &mut C) -> Result<(), StackError> {
        if !self.contains(target) {
            return Err(StackError::NotOnStack(target));
        }
        debug!("stack: pop down to {}", target);
        while let Some(id) = self.stack.pop() {
            if let Some(screen) = self.screens.get_mut(&id) {
                debug!("stack: {}.on_exit()", id);
                screen.on_exit(ctx);
            }
            if id == target {
                break;
            }
        }
        Ok(())
    }

    // ── Tick phases ───────────────────────────────────────────────────────────

    pub fn clear_input(&mut self) {
        for id in self.stack.iter().rev() {
            if let Some(screen) = self.screens.get_mut(id) {
                screen.clear_input();
            }
        }
    }

    /// Offer `key` to screens from the top down.  Returns `false` when nobody
    /// claimed it.
    pub fn dispatch_input(&mut self, key: KeyEvent, ctx: &C) -> bool {
        for id in self.stack.iter().rev() {
            let Some(screen) = self.screens.get_mut(id) else {
                continue;
            };
            let claimed = screen.handle_input(key, ctx);
            if claimed || screen.kind() == ScreenKind::Dialog {
                debug!("stack: {} consumed {:?}", id, key.code);
                return true;
            }
        }
        false
    }

    pub fn broadcast_alarm_event(&mut self, event: AlarmEvent) {
        debug!("stack: broadcasting {:?}", event);
        for id in self.stack.iter().rev() {
            if let Some(screen) = self.screens.get_mut(id) {
                screen.on_alarm_event(event);
            }
        }
    }

    /// Collect one action from every screen, top to bottom, then resolve them
    /// in that order.
    pub fn update(&mut self, ctx: &mut C) -> Result<(), StackError> {
        let snapshot = self.ids().to_vec();
        let mut proposals = Vec::with_capacity(snapshot.len());
        for &id in snapshot.iter().rev() {
            let screen = self
                .screens
                .get_mut(&id)
                .ok_or(StackError::Unregistered(id))?;
            let action = screen
                .update(ctx, &snapshot)
                .map_err(|e| StackError::Screen { id, source: e.into() })?;
            proposals.push((id, action));
        }
        for (proposer, action) in proposals {
            self.resolve(proposer, action, ctx)?;
        }
        Ok(())
    }

    fn resolve(&mut self, proposer: ScreenId, action: NavAction, ctx: &mut C) -> Result<(), StackError> {
        if action == NavAction::NoOp {
            return Ok(());
        }
        // A screen popped earlier in this tick no longer gets a say.
        if !self.contains(proposer) {
            debug!("stack: dropping {:?} from popped {}", action, proposer);
            return Ok(());
        }
        debug!("stack: {} requests {:?}", proposer, action);
        match action {
            NavAction::NoOp => {}
            NavAction::PushTop(next) => self.push(next, ctx)?,
            NavAction::SwitchTop(next) => {
                let top = self.top().ok_or(StackError::EmptyStack)?;
                self.pop_to(top, ctx)?;
                self.push(next, ctx)?;
            }
            NavAction::PopSelf => self.pop_to(proposer, ctx)?,
            NavAction::SwitchSelf(next) => {
                self.pop_to(proposer, ctx)?;
                self.push(next, ctx)?;
            }
            NavAction::Pop(target) => self.pop_to(target, ctx)?,
        }
        Ok(())
    }

    /// Draw every screen bottom to top.  Each layer draws inside the area the
    /// layer below handed it.
    pub fn draw(&self, frame: &mut Frame, ctx: &C) {
        let mut area = frame.area();
        for id in &self.stack {
            if let Some(screen) = self.screens.get(id) {
                area = screen.draw(frame, area, ctx, &self.stack);
            }
        }
    }
}
