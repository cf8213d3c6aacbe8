use crate::resolver::NameResolver;

/// Pointer events a rendered polygon forwards. The map widget binds these per
/// feature and delivers them one at a time.
pub trait HoverHandler {
    fn on_enter(&mut self, raw_name: &str);
    fn on_leave(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Active(String),
}

#[derive(Debug, Clone, Default)]
pub struct HoverController {
    resolver: NameResolver,
    state: HoverState,
}

impl HoverController {
    pub fn new(resolver: NameResolver) -> Self {
        Self {
            resolver,
            state: HoverState::Idle,
        }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn active(&self) -> Option<&str> {
        match &self.state {
            HoverState::Active(name) => Some(name),
            HoverState::Idle => None,
        }
    }

    /// Both halves of a merged pair light up together.
    pub fn highlighted(&self, raw_name: &str) -> bool {
        self.active() == Some(self.resolver.canonical_name(raw_name))
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }
}

impl HoverHandler for HoverController {
    fn on_enter(&mut self, raw_name: &str) {
        let canonical = self.resolver.canonical_name(raw_name).to_string();
        self.state = HoverState::Active(canonical);
    }

    fn on_leave(&mut self) {
        self.state = HoverState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MergeGroup;

    fn controller() -> HoverController {
        HoverController::new(
            NameResolver::new(vec![MergeGroup {
                display_name: "Ponda".to_string(),
                primary: "Ponda".to_string(),
                members: vec!["Ponda".to_string(), "Dharbandora".to_string()],
            }])
            .unwrap(),
        )
    }

    #[test]
    fn starts_idle() {
        let c = controller();
        assert_eq!(c.state(), &HoverState::Idle);
        assert!(!c.highlighted("Pernem"));
    }

    #[test]
    fn enter_stores_canonical_name() {
        let mut c = controller();
        c.on_enter("Dharbandora");
        assert_eq!(c.state(), &HoverState::Active("Ponda".to_string()));
    }

    #[test]
    fn merged_pair_highlights_together() {
        let mut c = controller();
        c.on_enter("Dharbandora");
        assert!(c.highlighted("Dharbandora"));
        assert!(c.highlighted("Ponda"));
        assert!(!c.highlighted("Pernem"));

        c.on_enter("Ponda");
        assert!(c.highlighted("Dharbandora"));
    }

    #[test]
    fn enter_enter_leave_ends_idle() {
        for (a, b) in [("Pernem", "Bardez"), ("Ponda", "Ponda"), ("Ponda", "Dharbandora")] {
            let mut c = controller();
            c.on_enter(a);
            c.on_enter(b);
            assert_eq!(c.active(), Some(c.resolver().canonical_name(b)));
            c.on_leave();
            assert_eq!(c.state(), &HoverState::Idle);
        }
    }

    #[test]
    fn leave_while_idle_stays_idle() {
        let mut c = controller();
        c.on_leave();
        assert_eq!(c.active(), None);
    }
}
