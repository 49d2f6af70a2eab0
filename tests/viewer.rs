//! End-to-end orchestration tests: a real channel pair, a spawned
//! worker with fake decode/render seams, and a viewer driving them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use slice_viewer::channel::{SliceGeometry, WorkerChannel};
use slice_viewer::controls::ControlIntent;
use slice_viewer::enums::AnatomicalAxis;
use slice_viewer::geometry::VolumeDimensions;
use slice_viewer::state::VolumeProperties;
use slice_viewer::surface::{DrawableSurface, SurfaceHandle};
use slice_viewer::viewer::Viewer;
use slice_viewer::worker::{DecodeError, RenderWorker, RendererError, SliceRenderer, VolumeDecoder};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

struct FakeDecoder;

impl VolumeDecoder for FakeDecoder {
    fn decode(&mut self, bytes: &[u8]) -> Result<VolumeProperties, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError("empty volume file".into()));
        }
        Ok(VolumeProperties {
            dimensions: VolumeDimensions {
                rows: 10,
                columns: 12,
                slices: 8,
                timepoints: 1,
            },
            maximum: 255.0,
        })
    }
}

#[derive(Clone, Default)]
struct FakeRenderer {
    rendered: Arc<Mutex<Vec<SliceGeometry>>>,
    refuse_init: bool,
}

impl SliceRenderer for FakeRenderer {
    fn initialize(&mut self, _surface: SurfaceHandle) -> Result<(), RendererError> {
        if self.refuse_init {
            Err(RendererError("adapter does not support float textures".into()))
        } else {
            Ok(())
        }
    }

    fn render(&mut self, geometry: &SliceGeometry) -> Result<(), RendererError> {
        self.rendered.lock().unwrap().push(geometry.clone());
        Ok(())
    }
}

async fn pump_until<P, F>(viewer: &mut Viewer<P>, mut done: F)
where
    P: slice_viewer::channel::RenderPort,
    F: FnMut(&Viewer<P>) -> bool,
{
    for _ in 0..200 {
        viewer.pump().expect("pump");
        if done(viewer) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition never became true");
}

#[tokio::test]
async fn load_handshake_and_scroll_render_the_latest_slice() {
    init_tracing();
    let (channel, endpoint) = WorkerChannel::pair();
    let renderer = FakeRenderer::default();
    let rendered = renderer.rendered.clone();
    let _worker = RenderWorker::spawn(FakeDecoder, renderer, endpoint);

    let mut viewer = Viewer::new(channel);
    viewer.mount_surface(DrawableSurface::new()).unwrap();
    viewer
        .load_file(slice_viewer::loader::LoadedFile {
            name: "demo.nii".into(),
            bytes: vec![1],
        })
        .unwrap();

    pump_until(&mut viewer, |viewer| {
        viewer.state().is_some_and(|state| state.renderer_ready)
    })
    .await;

    let state = viewer.state().unwrap();
    assert_eq!(state.focal_point.z, 4);
    assert_eq!(state.axis, AnatomicalAxis::Axial);

    // Initial render lands at the seeded center.
    for _ in 0..200 {
        if !rendered.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(rendered.lock().unwrap()[0].coordinate, 4);

    // Scroll up three times, then once more against the bound.
    for _ in 0..4 {
        viewer.apply(ControlIntent::WheelTick { delta: -1.0 }).unwrap();
    }
    assert_eq!(viewer.state().unwrap().focal_point.z, 7);

    for _ in 0..200 {
        if rendered
            .lock()
            .unwrap()
            .iter()
            .any(|geometry| geometry.coordinate == 7)
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let rendered = rendered.lock().unwrap();
    assert!(rendered.iter().any(|geometry| geometry.coordinate == 7));
    // Most-recent-wins: nothing past the clamped coordinate, and nothing
    // below the starting point.
    assert!(rendered.iter().all(|geometry| (4..=7).contains(&geometry.coordinate)));
}

#[tokio::test]
async fn renderer_unavailable_blocks_the_session_but_not_decoding() {
    init_tracing();
    let (channel, endpoint) = WorkerChannel::pair();
    let renderer = FakeRenderer {
        refuse_init: true,
        ..Default::default()
    };
    let rendered = renderer.rendered.clone();
    let _worker = RenderWorker::spawn(FakeDecoder, renderer, endpoint);

    let mut viewer = Viewer::new(channel);
    viewer.mount_surface(DrawableSurface::new()).unwrap();
    viewer
        .load_file(slice_viewer::loader::LoadedFile {
            name: "demo.nii".into(),
            bytes: vec![1],
        })
        .unwrap();

    pump_until(&mut viewer, |viewer| {
        viewer.renderer_failure().is_some() && viewer.state().is_some()
    })
    .await;

    assert_eq!(
        viewer.renderer_failure(),
        Some("adapter does not support float textures")
    );
    assert!(!viewer.state().unwrap().renderer_ready);

    // Scrolling still mutates state, but no render ever goes out.
    viewer.apply(ControlIntent::WheelTick { delta: -1.0 }).unwrap();
    viewer.pump().unwrap();
    tokio::time::sleep(Duration::from_millis(25)).await;
    assert_eq!(viewer.state().unwrap().focal_point.z, 5);
    assert!(rendered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn decode_failure_keeps_the_worker_alive_for_a_retry() {
    init_tracing();
    let (channel, endpoint) = WorkerChannel::pair();
    let _worker = RenderWorker::spawn(FakeDecoder, FakeRenderer::default(), endpoint);

    let mut viewer = Viewer::new(channel);
    viewer.mount_surface(DrawableSurface::new()).unwrap();
    viewer
        .load_file(slice_viewer::loader::LoadedFile {
            name: "broken.nii".into(),
            bytes: Vec::new(),
        })
        .unwrap();

    pump_until(&mut viewer, |viewer| viewer.decode_failure().is_some()).await;
    assert_eq!(viewer.decode_failure(), Some("empty volume file"));
    assert!(viewer.state().is_none());

    // The same worker handles the retry.
    viewer
        .load_file(slice_viewer::loader::LoadedFile {
            name: "demo.nii".into(),
            bytes: vec![1],
        })
        .unwrap();
    pump_until(&mut viewer, |viewer| {
        viewer.state().is_some() && viewer.decode_failure().is_none()
    })
    .await;
    assert_eq!(viewer.state().unwrap().dimensions.slices, 8);
}

#[tokio::test]
async fn viewers_are_independent_instances() {
    init_tracing();
    let (channel_a, endpoint_a) = WorkerChannel::pair();
    let (channel_b, endpoint_b) = WorkerChannel::pair();
    let _worker_a = RenderWorker::spawn(FakeDecoder, FakeRenderer::default(), endpoint_a);
    let _worker_b = RenderWorker::spawn(FakeDecoder, FakeRenderer::default(), endpoint_b);

    let mut viewer_a = Viewer::new(channel_a);
    let mut viewer_b = Viewer::new(channel_b);
    for viewer in [&mut viewer_a, &mut viewer_b] {
        viewer.mount_surface(DrawableSurface::new()).unwrap();
        viewer
            .load_file(slice_viewer::loader::LoadedFile {
                name: "demo.nii".into(),
                bytes: vec![1],
            })
            .unwrap();
    }
    pump_until(&mut viewer_a, |viewer| viewer.state().is_some()).await;
    pump_until(&mut viewer_b, |viewer| viewer.state().is_some()).await;

    viewer_a
        .apply(ControlIntent::SelectAxis(AnatomicalAxis::Sagittal))
        .unwrap();
    assert_eq!(viewer_a.state().unwrap().axis, AnatomicalAxis::Sagittal);
    assert_eq!(viewer_b.state().unwrap().axis, AnatomicalAxis::Axial);
}
