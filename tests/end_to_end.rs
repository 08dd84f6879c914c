use inputlink::backends::{RawInput, RawInputProvider, RawKeyboardPacket, ScriptedDevice};
use inputlink::devices::{keyboard, mouse, standard_controller, STANDARD_CONTROLLER};
use inputlink::{
    BindingProfile, ConnectError, Control, ControlValue, Controller, ControllerEvent,
    ControllerEventKind, ControllerListener, DeviceHandle, EventFilter, InputManager,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<(String, String, ControlValue)>>>,
}

impl Recorder {
    fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(c, n, _)| format!("{c}.{n}"))
            .collect()
    }
}

impl ControllerListener for Recorder {
    fn on_event(&mut self, event: &ControllerEvent) {
        if let ControllerEventKind::ControlChanged { name, value, .. } = &event.kind {
            self.events
                .lock()
                .unwrap()
                .push((event.controller_name.clone(), name.clone(), *value));
        }
    }
}

#[test]
fn backend_key_press_is_dispatched_once() {
    let (device, script) = ScriptedDevice::new();
    let mut input = InputManager::new();
    let kb = input
        .add_controller(
            Controller::device("Keyboard", "scripted keyboard")
                .with_control(Control::key("A", "A", 'a'))
                .with_backend(DeviceHandle::owned(device)),
        )
        .unwrap();

    let recorder = Recorder::default();
    input
        .events()
        .add_listener(recorder.clone(), EventFilter::ControlsOnly, None);

    script.press("A");
    assert_eq!(input.update(), 1);
    assert_eq!(recorder.names(), ["Keyboard.A"]);

    assert!(input.has_changed(kb));
    assert!(!input.has_changed(kb));
    // the hit flag went into the character
    let a = input.controller(kb).unwrap().control("A").unwrap();
    assert!(a.is_pressed() && !a.is_hit());
    assert_eq!(input.take_char(kb), Some('a'));
    assert_eq!(input.take_char(kb), None);

    // nothing new
    assert_eq!(input.update(), 0);
    assert_eq!(recorder.names().len(), 1);
    assert!(!input.has_changed(kb));
}

#[test]
fn repeated_state_is_not_dispatched() {
    let mut input = InputManager::new();
    let kb = input.add_controller(keyboard()).unwrap();
    let a = input.control_id(kb, "A").unwrap();

    let count = Arc::new(AtomicUsize::new(0));
    struct Counter(Arc<AtomicUsize>);
    impl ControllerListener for Counter {
        fn on_event(&mut self, _: &ControllerEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
    input
        .events()
        .add_listener(Counter(count.clone()), EventFilter::All, Some("Keyboard".into()));

    assert!(input.set_pressed(a, true));
    assert!(!input.set_pressed(a, true));
    input.update();
    assert!(!input.set_pressed(a, true));
    input.update();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn raw_keyboard_drives_the_standard_controller() {
    let raw = RawInput::new();
    let mut input = InputManager::new();
    input.add_provider(RawInputProvider::new(raw.clone()));
    input.detect_devices(false);
    let game = input.add_controller(standard_controller()).unwrap();
    assert!(input.apply_profile(game, &BindingProfile::standard()) > 0);

    let recorder = Recorder::default();
    input.events().add_listener(
        recorder.clone(),
        EventFilter::ControlsOnly,
        Some(STANDARD_CONTROLLER.into()),
    );

    // W down
    raw.keyboard_packet(RawKeyboardPacket {
        vkey: 0x57,
        is_break: false,
    });
    input.update();
    input.update();
    let mut seen = recorder.names();
    seen.sort();
    assert_eq!(
        seen,
        [
            format!("{STANDARD_CONTROLLER}.Forward"),
            format!("{STANDARD_CONTROLLER}.W"),
        ]
    );
    assert_eq!(input.take_char(game), Some('w'));

    // switched off: the virtual side stops listening
    input.set_active(game, false);
    raw.keyboard_packet(RawKeyboardPacket {
        vkey: 0x57,
        is_break: true,
    });
    input.update();
    input.update();
    let forward = input.controller(game).unwrap().control("Forward").unwrap();
    assert!(forward.is_pressed());

    let snapshot = input.snapshot();
    assert_eq!(snapshot.get("Keyboard").map(|s| s.get_button("W")), Some(false));
    assert_eq!(
        snapshot.get(STANDARD_CONTROLLER).map(|s| s.get_button("Forward")),
        Some(true)
    );
}

#[test]
fn graph_rules_hold_through_the_public_api() {
    let mut input = InputManager::new();
    let game = input.add_controller(standard_controller()).unwrap();
    let lights = input
        .add_controller(
            Controller::virtual_controller("Lights", "LED sink")
                .with_control(Control::led("LEDs", "")),
        )
        .unwrap();
    let m = input.add_controller(mouse()).unwrap();
    assert!(input.add_controller(mouse()).is_none());
    assert_eq!(input.devices().count(), 1);

    let left = input.control_id(m, "Left").unwrap();
    assert!(matches!(
        input.try_connect(m, "Right", left, 1.0),
        Err(ConnectError::DeviceSink(_))
    ));
    assert!(matches!(
        input.try_connect(lights, "LEDs", left, 1.0),
        Err(ConnectError::ClassMismatch { .. })
    ));

    let connection = input.connect(game, "MouseLeft", left, 1.0).unwrap();
    assert!(input.controller(game).unwrap().connections().contains(&connection));

    input.remove_controller(m);
    assert!(input.controller(game).unwrap().connections().is_empty());
    assert!(input.connection(connection).is_none());
}
