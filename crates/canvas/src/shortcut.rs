use weave_core::ItemKey;
use weave_property::factory::PropertyFactory;

use crate::behaviour::Behaviour;
use crate::diagnostics::Severity;
use crate::error::CanvasError;
use crate::portal::Portal;
use crate::resolve::LinkContext;
use crate::token::{ItemHeader, ShortcutToken};

/// A second on-canvas handle for an existing behaviour.
///
/// It mirrors the original's portals so links can attach to it, and keeps
/// only a key to the original. When a load cannot find the original the
/// shortcut stays on the canvas in a broken state instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviourShortcut {
    behaviour: Behaviour,
    original: Option<ItemKey>,
    pending_original: Option<i64>,
    broken: bool,
}

impl BehaviourShortcut {
    /// Mirror `original`, whose canvas item is `key`.
    #[must_use]
    pub fn from_original(original: &Behaviour, key: ItemKey) -> Self {
        let mut behaviour = Behaviour::new(original.alias.clone(), original.behaviour_type.clone());
        for portal in original.portals() {
            behaviour
                .add_portal(portal.direction(), portal.property.clone())
                .custom = portal.custom;
        }
        *behaviour.properties_mut() = original.properties().clone();
        Self {
            behaviour,
            original: Some(key),
            pending_original: None,
            broken: false,
        }
    }

    #[must_use]
    pub fn behaviour(&self) -> &Behaviour {
        &self.behaviour
    }

    pub fn behaviour_mut(&mut self) -> &mut Behaviour {
        &mut self.behaviour
    }

    /// Key of the aliased behaviour, `None` while unresolved or broken.
    #[must_use]
    pub fn original(&self) -> Option<ItemKey> {
        self.original
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    #[must_use]
    pub fn portals(&self) -> &[Portal] {
        self.behaviour.portals()
    }

    #[must_use]
    pub fn to_token(&self, header: ItemHeader, original_id: Option<i64>) -> ShortcutToken {
        ShortcutToken {
            behaviour: self.behaviour.to_token(header),
            original_id,
        }
    }

    /// Load portals and remember the original's id for the linking phase.
    pub fn load_token(
        &mut self,
        token: &ShortcutToken,
        factory: &dyn PropertyFactory,
    ) -> Result<(), CanvasError> {
        self.behaviour.load_token(&token.behaviour, factory)?;
        self.pending_original = token.original_id;
        self.original = None;
        self.broken = false;
        Ok(())
    }

    /// Resolve the original through the link map.
    ///
    /// Never fails: a missing original degrades the shortcut to the
    /// configured label and emits a single warning.
    pub(crate) fn resolve(&mut self, own_id: i64, ctx: &LinkContext<'_>) {
        let wanted = self.pending_original.take();
        let entry = wanted
            .and_then(|id| ctx.map.get(id))
            .filter(|entry| entry.target.can_be_aliased());

        match entry {
            Some(entry) => {
                self.original = Some(entry.key);
                if let Some(alias) = &entry.target.alias {
                    self.behaviour.alias.clone_from(alias);
                }
                self.broken = false;
            }
            None => {
                self.mark_broken(&ctx.config.broken_shortcut_label);
                let text = match wanted {
                    Some(id) => format!("shortcut {own_id} references missing original {id}"),
                    None => format!("shortcut {own_id} has no original"),
                };
                ctx.logger.log_message(&text, "canvas", Severity::Warning);
            }
        }
    }

    pub(crate) fn mark_broken(&mut self, label: &str) {
        self.original = None;
        self.broken = true;
        label.clone_into(&mut self.behaviour.alias);
    }

    pub fn dispose(&mut self) {
        self.behaviour.dispose();
        self.original = None;
    }
}
