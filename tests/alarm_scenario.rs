//! End-to-end tests driving a home alarm through the public API.

use krypton::builder::{EventBuilder, MachineBuilder, StateBuilder};
use krypton::core::{Event, EventHooks, Payload, State, StateHooks};
use krypton::machine::{FireError, Machine};
use serde_json::json;
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::thread;

type Log = Arc<Mutex<Vec<String>>>;

struct Alarm {
    machine: Machine,
    armed: State,
    disarmed: State,
    alarm: State,
    arm: Event,
    disarm: Event,
    breach: Event,
    panic: Event,
    reset: Event,
}

fn alarm_system() -> Alarm {
    let [armed, disarmed, alarm] = krypton::states!["Armed", "Disarmed", "Alarm"].unwrap();

    let arm = Event::new("Arm", [disarmed.clone()], armed.clone()).unwrap();
    let disarm = Event::new("Disarm", [armed.clone()], disarmed.clone()).unwrap();
    let breach = Event::new("Breach", [armed.clone()], alarm.clone()).unwrap();
    let panic = Event::new("Panic", [armed.clone()], alarm.clone()).unwrap();
    let reset = Event::new("Reset", [alarm.clone()], disarmed.clone()).unwrap();

    let machine = MachineBuilder::new()
        .states([armed.clone(), disarmed.clone(), alarm.clone()])
        .events([
            arm.clone(),
            disarm.clone(),
            breach.clone(),
            panic.clone(),
            reset.clone(),
        ])
        .initial(disarmed.clone())
        .build()
        .unwrap();

    Alarm {
        machine,
        armed,
        disarmed,
        alarm,
        arm,
        disarm,
        breach,
        panic,
        reset,
    }
}

fn push(log: &Log, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

#[test]
fn alarm_end_to_end() {
    let mut system = alarm_system();
    let machine = &mut system.machine;

    machine.activate();
    assert!(machine.is_in(&system.disarmed));

    assert!(matches!(
        machine.fire(&system.breach),
        Err(FireError::CannotFire { .. })
    ));
    assert!(machine.is_in(&system.disarmed));

    machine.fire(&system.arm).unwrap();
    assert!(machine.is_in(&system.armed));

    machine.fire(&system.breach).unwrap();
    assert!(machine.is_in(&system.alarm));

    machine.fire(&system.reset).unwrap();
    assert!(machine.is_in(&system.disarmed));

    machine.fire(&system.arm).unwrap();
    machine.fire(&system.panic).unwrap();
    assert!(machine.is_in(&system.alarm));
    assert!(matches!(
        machine.fire(&system.disarm),
        Err(FireError::CannotFire { .. })
    ));

    assert_eq!(
        machine.history().get_path(),
        vec!["Disarmed", "Armed", "Alarm", "Disarmed", "Armed", "Alarm"]
    );
}

#[test]
fn refusal_messages_carry_details() {
    let mut system = alarm_system();
    system.machine.activate();

    let error = system.machine.fire(&system.breach).unwrap_err();
    match &error {
        FireError::CannotFire {
            event,
            current,
            sources,
        } => {
            assert_eq!(event, "Breach");
            assert_eq!(current, "Disarmed");
            assert_eq!(sources, &vec!["Armed".to_string()]);
        }
        other => panic!("Expected CannotFire, got {other:?}"),
    }
    assert!(error.to_string().contains("`Breach` event while in the `Disarmed` state"));
}

#[test]
fn firing_before_activation_keeps_placeholder() {
    let mut system = alarm_system();

    assert!(system.machine.can_fire(&Event::new("Anywhere", Vec::new(), system.alarm.clone()).unwrap()));
    assert!(!system.machine.can_fire(&system.arm));
    assert_eq!(system.machine.fire(&system.arm), Err(FireError::NotActivated));
    assert!(!system.machine.is_in(&system.disarmed));
    assert_eq!(system.machine.current_state().name(), "Starting-State");
}

#[test]
fn hooks_run_in_contract_order() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let hooked_state = |name: &str| {
        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
        State::with(
            name,
            Payload::new(),
            StateHooks::new()
                .before_enter(move |state, _| push(&l1, format!("{state}.before_enter")))
                .after_enter(move |state, _| push(&l2, format!("{state}.after_enter")))
                .before_exit(move |state, _| push(&l3, format!("{state}.before_exit")))
                .after_exit(move |state, _| push(&l4, format!("{state}.after_exit"))),
        )
        .unwrap()
    };

    let disarmed = hooked_state("Disarmed");
    let armed = hooked_state("Armed");

    let (g, before, after) = (log.clone(), log.clone(), log.clone());
    let arm = Event::with_hooks(
        "Arm",
        [disarmed.clone()],
        armed.clone(),
        EventHooks::new()
            .when(move |event, _| {
                push(&g, format!("{}.should_fire", event.name()));
                true
            })
            .before_fire(move |event, _| push(&before, format!("{}.before_fire", event.name())))
            .after_fire(move |event, _| push(&after, format!("{}.after_fire", event.name()))),
    )
    .unwrap();

    let mut machine = Machine::new(disarmed.clone());
    machine.add_states([disarmed, armed.clone()]);
    machine.add_event(arm.clone());
    machine.activate();
    machine.fire(&arm).unwrap();

    assert!(machine.is_in(&armed));
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "Disarmed.before_enter",
            "Disarmed.after_enter",
            "Arm.should_fire",
            "Arm.before_fire",
            "Disarmed.before_exit",
            "Arm.after_fire",
            "Disarmed.after_exit",
            "Armed.before_enter",
            "Armed.after_enter",
        ]
    );
}

#[test]
fn declined_firing_runs_no_hooks_after_the_gate() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let exit_log = log.clone();

    let disarmed = StateBuilder::new()
        .name("Disarmed")
        .before_exit(move |state, _| push(&exit_log, format!("{state}.before_exit")))
        .build()
        .unwrap();
    let armed = State::new("Armed").unwrap();

    let fire_log = log.clone();
    let arm = EventBuilder::new()
        .name("Arm")
        .source(disarmed.clone())
        .destination(armed.clone())
        .when(|_, transition| transition.context().get("code") == Some(&json!("1234")))
        .before_fire(move |event, _| push(&fire_log, format!("{}.before_fire", event.name())))
        .build()
        .unwrap();

    let mut machine = Machine::new(disarmed.clone());
    machine.add_states([disarmed.clone(), armed.clone()]);
    machine.add_event(arm.clone());
    machine.activate();

    let mut wrong = Payload::new();
    wrong.insert("code".to_string(), json!("0000"));
    assert_eq!(
        machine.fire_with(&arm, wrong),
        Err(FireError::Declined {
            event: "Arm".to_string()
        })
    );
    assert!(machine.is_in(&disarmed));
    assert!(log.lock().unwrap().is_empty());

    let mut right = Payload::new();
    right.insert("code".to_string(), json!("1234"));
    machine.fire_with(&arm, right).unwrap();
    assert!(machine.is_in(&armed));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["Arm.before_fire", "Disarmed.before_exit"]
    );
}

#[test]
fn transition_id_matches_history_record() {
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();

    let idle = State::new("Idle").unwrap();
    let busy = State::new("Busy").unwrap();
    let start = Event::with_hooks(
        "Start",
        [idle.clone()],
        busy.clone(),
        EventHooks::new().after_fire(move |_, transition| {
            *sink.lock().unwrap() = Some(transition.id());
        }),
    )
    .unwrap();

    let mut machine = Machine::new(idle.clone());
    machine.add_states([idle, busy]);
    machine.add_event(start.clone());
    machine.activate();
    machine.fire(&start).unwrap();

    let record = machine.history().last().unwrap();
    assert_eq!(Some(record.id), *seen.lock().unwrap());
}

#[test]
fn machine_can_be_shared_behind_a_lock() {
    let mut system = alarm_system();
    system.machine.activate();

    let arm = system.arm.clone();
    let disarm = system.disarm.clone();
    let shared = Arc::new(Mutex::new(system.machine));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            let (arm, disarm) = (arm.clone(), disarm.clone());
            thread::spawn(move || {
                for _ in 0..50 {
                    let mut machine = shared.lock().unwrap();
                    let event = if machine.can_fire(&arm) { &arm } else { &disarm };
                    machine.fire(event).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let machine = shared.lock().unwrap();
    // 200 alternating firings from Disarmed end back in Disarmed.
    assert!(machine.is_in(&system.disarmed));
}

#[test]
fn hooks_run_while_the_shared_lock_is_held() {
    let slot: Arc<OnceLock<Weak<Mutex<Machine>>>> = Arc::new(OnceLock::new());
    let observed = Arc::new(Mutex::new(Vec::new()));

    let (hook_slot, hook_observed) = (Arc::clone(&slot), Arc::clone(&observed));
    let idle = State::new("Idle").unwrap();
    let busy = State::new("Busy").unwrap();
    let start = Event::with_hooks(
        "Start",
        [idle.clone()],
        busy.clone(),
        EventHooks::new().before_fire(move |_, _| {
            if let Some(shared) = hook_slot.get().and_then(Weak::upgrade) {
                hook_observed.lock().unwrap().push(shared.try_lock().is_err());
            }
        }),
    )
    .unwrap();

    let mut machine = Machine::new(idle.clone());
    machine.add_states([idle, busy.clone()]);
    machine.add_event(start.clone());
    machine.activate();

    let shared = Arc::new(Mutex::new(machine));
    slot.set(Arc::downgrade(&shared)).unwrap();

    shared.lock().unwrap().fire(&start).unwrap();

    assert_eq!(*observed.lock().unwrap(), vec![true]);
    assert!(shared.lock().unwrap().is_in(&busy));
}

#[test]
fn lookup_and_fire_with_ten_thousand_events() {
    let a = State::new("State-A").unwrap();
    let b = State::new("State-B").unwrap();

    let mut machine = Machine::new(a.clone());
    machine.add_states([a.clone(), b.clone()]);
    machine.add_events(
        (0..=10_000).map(|index| {
            Event::new(format!("Event-{index}"), [a.clone(), b.clone()], b.clone()).unwrap()
        }),
    );
    machine.activate();

    assert_eq!(machine.event_count(), 10_001);

    let event = machine.lookup_event("Event-4200").unwrap().clone();
    for _ in 0..1_000 {
        machine.fire(&event).unwrap();
    }
    assert!(machine.is_in(&b));
    assert!(machine.lookup_event("Event-10001").is_err());

    for index in (0..=10_000).step_by(97) {
        machine
            .fire_named(&format!("Event-{index}"), Payload::new())
            .unwrap();
    }
    assert_eq!(machine.history().len(), machine.history().limit());
}

#[test]
fn lookup_and_registration_with_ten_thousand_states() {
    let initial = State::new("State-Initial").unwrap();
    let mut machine = Machine::new(initial);

    machine.add_states((0..=10_000).map(|index| State::new(format!("State-{index}")).unwrap()));
    machine.add_states((0..=10_000).map(|index| State::new(format!("State-{index}")).unwrap()));
    machine.activate();

    assert_eq!(machine.state_count(), 10_001);
    assert!(machine.lookup_state("State-4200").is_ok());
    assert!(machine.lookup_event("State-4200").is_err());
}
