//! The assembled scene: controller, dispatcher and the objects the player
//! can point at.

use crate::interaction::{Interactable, InteractableKind, InteractionDispatcher, InteractionOutcome};
use crate::phase_transition::PhaseTransitionController;
use tracing::warn;

pub const FREEZER: &str = "freezer";
pub const CONTAINER: &str = "pot";
pub const HEAT_SWITCH: &str = "stove switch";

pub struct Lab {
    pub controller: PhaseTransitionController,
    pub dispatcher: InteractionDispatcher,
    pub objects: Vec<Interactable>,
}

impl Lab {
    /// A lab with the standard freezer, pot and stove switch
    pub fn new(controller: PhaseTransitionController, dispatcher: InteractionDispatcher) -> Self {
        let objects = vec![
            Interactable::new(FREEZER, InteractableKind::Freezer)
                .with_explanation("The freezer keeps water below 0 °C, so it stays solid."),
            Interactable::new(CONTAINER, InteractableKind::Container)
                .with_explanation("Heat flows from the stove through the pot into the ice."),
            Interactable::new(HEAT_SWITCH, InteractableKind::HeatSwitch)
                .with_explanation("Switches the stove on and off."),
        ];
        Self::with_objects(controller, dispatcher, objects)
    }

    pub fn with_objects(
        controller: PhaseTransitionController,
        dispatcher: InteractionDispatcher,
        objects: Vec<Interactable>,
    ) -> Self {
        Self {
            controller,
            dispatcher,
            objects,
        }
    }

    pub fn object(&self, name: &str) -> Option<&Interactable> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Activate the named object. `None` if no such object is in the scene.
    pub fn interact(&mut self, name: &str) -> Option<InteractionOutcome> {
        let Some(target) = self.objects.iter().find(|o| o.name == name) else {
            warn!(name, "interaction with unknown object");
            return None;
        };
        Some(self.dispatcher.interact(target, &mut self.controller))
    }

    pub fn hover_enter(&mut self, name: &str) {
        if let Some(target) = self.objects.iter().find(|o| o.name == name) {
            self.dispatcher.hover_enter(target);
        }
    }

    pub fn hover_exit(&mut self, name: &str) {
        if let Some(target) = self.objects.iter().find(|o| o.name == name) {
            self.dispatcher.hover_exit(target);
        }
    }
}
