//! Graphviz rendering of a machine's transition graph.

use super::engine::Machine;
use crate::core::Event;

impl Machine {
    /// Render the transition graph in DOT format.
    ///
    /// Events are emitted sorted by name and each event's sources sorted by
    /// name, so the output is stable for a given registry. Wildcard events
    /// have no explicit sources and produce no edges.
    ///
    /// # Example
    ///
    /// ```rust
    /// use krypton::core::{Event, State};
    /// use krypton::machine::Machine;
    ///
    /// let a = State::new("A").unwrap();
    /// let b = State::new("B").unwrap();
    /// let mut machine = Machine::new(a.clone());
    /// machine.add_states([a.clone(), b.clone()]);
    /// machine.add_event(Event::new("Go", [a], b).unwrap());
    /// machine.activate();
    ///
    /// let dot = machine.dot_description();
    /// assert!(dot.contains(r#""A" -> "B" [label="Go""#));
    /// ```
    pub fn dot_description(&self) -> String {
        let mut events: Vec<&Event> = self.events().collect();
        events.sort_by(|left, right| left.name().cmp(right.name()));

        let mut dot = String::from("digraph StateMachine {\n");
        dot.push_str(&format!(
            "  \"\" [style=\"invis\"]; \"\" -> \"{}\" [dir=both, arrowtail=dot]; // Initial State\n",
            self.initial_state().name()
        ));
        dot.push_str(&format!(
            "  \"{}\" [style=bold]; // Current State\n",
            self.current_state().name()
        ));

        for event in events {
            for source in event.sources() {
                dot.push_str(&format!(
                    "  \"{}\" -> \"{}\" [label=\"{}\", fontname=\"Menlo Italic\", fontsize=9];\n",
                    source.name(),
                    event.destination().name(),
                    event.name()
                ));
            }
        }

        dot.push('}');
        dot
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Event, State};
    use crate::machine::Machine;

    fn state(name: &str) -> State {
        State::new(name).unwrap()
    }

    #[test]
    fn renders_alarm_graph() {
        let armed = state("Armed");
        let disarmed = state("Disarmed");
        let alarm = state("Alarm");

        let mut machine = Machine::new(disarmed.clone());
        machine.add_states([armed.clone(), disarmed.clone(), alarm.clone()]);
        machine.add_events([
            Event::new("Reset", [alarm.clone()], disarmed.clone()).unwrap(),
            Event::new("Arm", [disarmed.clone()], armed.clone()).unwrap(),
            Event::new("Disarm", [armed.clone(), alarm.clone()], disarmed.clone()).unwrap(),
            Event::new("Breach", [armed.clone()], alarm.clone()).unwrap(),
        ]);
        machine.activate();

        let expected = [
            "digraph StateMachine {",
            r#"  "" [style="invis"]; "" -> "Disarmed" [dir=both, arrowtail=dot]; // Initial State"#,
            r#"  "Disarmed" [style=bold]; // Current State"#,
            r#"  "Disarmed" -> "Armed" [label="Arm", fontname="Menlo Italic", fontsize=9];"#,
            r#"  "Armed" -> "Alarm" [label="Breach", fontname="Menlo Italic", fontsize=9];"#,
            r#"  "Alarm" -> "Disarmed" [label="Disarm", fontname="Menlo Italic", fontsize=9];"#,
            r#"  "Armed" -> "Disarmed" [label="Disarm", fontname="Menlo Italic", fontsize=9];"#,
            r#"  "Alarm" -> "Disarmed" [label="Reset", fontname="Menlo Italic", fontsize=9];"#,
            "}",
        ]
        .join("\n");

        assert_eq!(machine.dot_description(), expected);
    }

    #[test]
    fn marks_current_state_after_firing() {
        let a = state("A");
        let b = state("B");
        let go = Event::new("Go", [a.clone()], b.clone()).unwrap();

        let mut machine = Machine::new(a.clone());
        machine.add_states([a, b]);
        machine.add_event(go.clone());
        machine.activate();
        machine.fire(&go).unwrap();

        let dot = machine.dot_description();
        assert!(dot.contains("\"\" -> \"A\" [dir=both, arrowtail=dot]; // Initial State\n"));
        assert!(dot.contains("  \"B\" [style=bold]; // Current State\n"));
    }

    #[test]
    fn wildcard_events_have_no_edges() {
        let a = state("A");
        let mut machine = Machine::new(a.clone());
        machine.add_state(a.clone());
        machine.add_event(Event::new("Reset", Vec::new(), a).unwrap());
        machine.activate();

        assert!(!machine.dot_description().contains("Reset"));
    }
}
