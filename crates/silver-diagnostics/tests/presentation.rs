use silver_diagnostics::{
    DecorationStyle, DiagnosticSession, DiagnosticsChange, DiagnosticsConfig, LogParser,
    MemoryBuffer, PopupRequest, PresentationAdapter, ResolvedSpan, SelectionRange, StatusUpdate,
    TextBuffer,
};
use std::sync::{Arc, Mutex};

const DOCUMENT: &str = "field f: Int\n\nmethod m(x: Ref)\n{\n  x.f := 1\n}\n";
const MESSAGE: &str =
    "Assignment might fail. There might be insufficient permission to access x.f.";

#[derive(Debug, Default)]
struct RecordingPresenter {
    regions: Option<(String, Vec<ResolvedSpan>)>,
    statuses: Vec<StatusUpdate>,
    popups: Vec<PopupRequest>,
}

impl PresentationAdapter for RecordingPresenter {
    fn draw_regions(&mut self, key: &str, spans: &[ResolvedSpan], _style: &DecorationStyle) {
        self.regions = Some((key.to_string(), spans.to_vec()));
    }

    fn erase_regions(&mut self, _key: &str) {
        self.regions = None;
    }

    fn set_status(&mut self, update: StatusUpdate) {
        self.statuses.push(update);
    }

    fn show_popup(&mut self, request: PopupRequest) {
        self.popups.push(request);
    }
}

fn loaded_session() -> DiagnosticSession {
    let mut session = DiagnosticSession::new(DiagnosticsConfig::default());
    let ticket = session.begin_load();
    let records = LogParser::new().parse_str(&format!("m.vpr,5:3,5:10,{MESSAGE}\n"));
    session.complete_load(ticket, records, DOCUMENT).unwrap();
    session
}

#[test]
fn test_decorations_drawn_and_erased() {
    let mut presenter = RecordingPresenter::default();
    let mut session = loaded_session();

    session.present_decorations(&mut presenter);
    let (key, spans) = presenter.regions.clone().expect("regions drawn");
    assert_eq!(key, "silicon-errors");
    assert_eq!(spans, vec![ResolvedSpan::new(33, 42)]);

    session.on_build_started();
    session.present_decorations(&mut presenter);
    assert!(presenter.regions.is_none());
}

#[test]
fn test_status_follows_selection() {
    let mut presenter = RecordingPresenter::default();
    let mut session = loaded_session();

    session.on_selection_changed(SelectionRange::caret(35));
    session.present_status(&mut presenter);
    session.on_selection_changed(SelectionRange::caret(2));
    session.present_status(&mut presenter);

    assert_eq!(
        presenter.statuses,
        vec![
            StatusUpdate::Set {
                key: "silicon-errors".to_string(),
                message: MESSAGE.to_string(),
            },
            StatusUpdate::Erase {
                key: "silicon-errors".to_string()
            },
        ]
    );
}

#[test]
fn test_popup_for_selection() {
    let mut presenter = RecordingPresenter::default();
    let session = loaded_session();

    session.present_popup(&mut presenter, SelectionRange::new(34, 38));
    session.present_popup(&mut presenter, SelectionRange::new(30, 38));

    assert!(matches!(
        &presenter.popups[0],
        PopupRequest::Show { max_width: 680, .. }
    ));
    assert_eq!(presenter.popups[1], PopupRequest::Hide);
}

#[test]
fn test_attached_buffer_drives_lookup() {
    let shared = DiagnosticSession::shared(DiagnosticsConfig::default());
    let mut buffer = MemoryBuffer::new(DOCUMENT);
    DiagnosticSession::attach(&shared, &mut buffer);

    let changes = Arc::new(Mutex::new(Vec::new()));
    {
        let changes = changes.clone();
        let mut session = shared.lock().unwrap();
        session.subscribe(move |event| changes.lock().unwrap().push(event.change.clone()));

        let ticket = session.begin_load();
        let records = LogParser::new().parse_str("m.vpr,3:1,3:17,Method m has a bad signature.");
        session.complete_load(ticket, records, &buffer.text()).unwrap();
    }

    buffer.move_caret(20);
    assert_eq!(
        shared.lock().unwrap().current_message(),
        Some("Method m has a bad signature.")
    );

    buffer.move_caret(0);
    assert_eq!(shared.lock().unwrap().current_message(), None);

    assert_eq!(
        *changes.lock().unwrap(),
        vec![
            DiagnosticsChange::Replaced { count: 1 },
            DiagnosticsChange::MessageChanged {
                message: Some("Method m has a bad signature.".to_string())
            },
            DiagnosticsChange::MessageChanged { message: None },
        ]
    );
}
