//! Routes hover and activate signals from scene objects to the inventory
//! and the phase-transition controller.

use crate::config::InteractionMessages;
use crate::constants::{ACTION_MESSAGE_DURATION_S, HOVER_MESSAGE_DURATION_S};
use crate::inventory::InventoryTracker;
use crate::phase_transition::PhaseTransitionController;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractableKind {
    /// Where solid blocks are picked up
    Freezer,
    /// Receives the solid and holds the melt
    Container,
    /// Heat source switch
    HeatSwitch,
    /// Scenery with an explanation but no action
    Inert,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub name: String,
    pub kind: InteractableKind,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Interactable {
    pub fn new(name: &str, kind: InteractableKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        self.explanation = Some(explanation.to_string());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionOutcome {
    SolidTaken,
    AlreadyHolding,
    SolidPlaced,
    NothingToPlace,
    ContainerBusy,
    HeatToggled { enabled: bool },
    NoAction,
}

/// Floating message panel in front of the player
pub trait MessageBoard {
    fn show_message(&mut self, text: &str, duration_s: f64);
    fn hide_now(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageLog {
    pub shown: Vec<String>,
    pub visible: Option<String>,
}

impl MessageBoard for MessageLog {
    fn show_message(&mut self, text: &str, _duration_s: f64) {
        self.shown.push(text.to_string());
        self.visible = Some(text.to_string());
    }

    fn hide_now(&mut self) {
        self.visible = None;
    }
}

impl<T: MessageBoard> MessageBoard for Rc<RefCell<T>> {
    fn show_message(&mut self, text: &str, duration_s: f64) {
        self.borrow_mut().show_message(text, duration_s);
    }

    fn hide_now(&mut self) {
        self.borrow_mut().hide_now();
    }
}

pub struct InteractionDispatcher {
    inventory: InventoryTracker,
    messages: InteractionMessages,
    board: Option<Box<dyn MessageBoard>>,
}

impl InteractionDispatcher {
    pub fn new(messages: InteractionMessages) -> Self {
        Self {
            inventory: InventoryTracker::new(),
            messages,
            board: None,
        }
    }

    pub fn with_board(mut self, board: impl MessageBoard + 'static) -> Self {
        self.board = Some(Box::new(board));
        self
    }

    pub fn inventory(&self) -> &InventoryTracker {
        &self.inventory
    }

    pub fn hover_enter(&mut self, target: &Interactable) {
        if let Some(text) = target.explanation.as_deref().filter(|t| !t.is_empty()) {
            self.show(text, HOVER_MESSAGE_DURATION_S);
        }
    }

    pub fn hover_exit(&mut self, _target: &Interactable) {
        if let Some(board) = self.board.as_mut() {
            board.hide_now();
        }
    }

    pub fn interact(
        &mut self,
        target: &Interactable,
        controller: &mut PhaseTransitionController,
    ) -> InteractionOutcome {
        debug!(name = %target.name, kind = ?target.kind, "interaction");

        let outcome = match target.kind {
            InteractableKind::Freezer => {
                if self.inventory.take_solid() {
                    controller.record_event(
                        "Solid taken",
                        "The player took a block from the freezer",
                    );
                    InteractionOutcome::SolidTaken
                } else {
                    InteractionOutcome::AlreadyHolding
                }
            }
            InteractableKind::Container => {
                if !self.inventory.is_holding_solid() {
                    InteractionOutcome::NothingToPlace
                } else if !controller.can_receive_solid() {
                    InteractionOutcome::ContainerBusy
                } else {
                    self.inventory.place_solid();
                    controller.receive_solid();
                    controller.record_event(
                        "Solid placed in container",
                        "The player placed the block in the container on the heat source",
                    );
                    InteractionOutcome::SolidPlaced
                }
            }
            InteractableKind::HeatSwitch => {
                controller.toggle_heat();
                InteractionOutcome::HeatToggled {
                    enabled: controller.heat_enabled(),
                }
            }
            InteractableKind::Inert => InteractionOutcome::NoAction,
        };

        let message = match outcome {
            InteractionOutcome::SolidTaken => self.messages.solid_taken.clone(),
            InteractionOutcome::AlreadyHolding => self.messages.already_holding.clone(),
            InteractionOutcome::SolidPlaced => self.messages.solid_placed.clone(),
            InteractionOutcome::NothingToPlace => self.messages.nothing_to_place.clone(),
            InteractionOutcome::ContainerBusy => self.messages.container_busy.clone(),
            InteractionOutcome::HeatToggled { enabled: true } => self.messages.heat_on.clone(),
            InteractionOutcome::HeatToggled { enabled: false } => self.messages.heat_off.clone(),
            InteractionOutcome::NoAction => self.messages.no_action.clone(),
        };
        self.show(&message, ACTION_MESSAGE_DURATION_S);

        outcome
    }

    fn show(&mut self, text: &str, duration_s: f64) {
        match self.board.as_mut() {
            Some(board) => board.show_message(text, duration_s),
            None => debug!(text, "no message board attached"),
        }
    }
}
