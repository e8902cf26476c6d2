//! Bouncers entry point
//!
//! Hosts the scheduler: a headless real-time runner on native targets and a
//! canvas-backed page on the web.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use glam::IVec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::{Clamped, JsCast};
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, ImageData, KeyboardEvent, MouseEvent,
        VisibilityState,
    };

    use bouncers::audio::WebAudio;
    use bouncers::input::key_text;
    use bouncers::renderer::{Framebuffer, Surface};
    use bouncers::{ProceduralAssets, Scheduler, Settings};

    /// Page state shared by every callback
    struct Host {
        scheduler: Scheduler,
        surface: Framebuffer,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
    }

    impl Host {
        fn start(&mut self) {
            let bounds = self.surface.size();
            if let Err(e) = self.scheduler.start(bounds, &ProceduralAssets::default()) {
                log::error!("Cannot start animation: {e}");
                return;
            }
            self.last_time = 0.0;
            self.scheduler.paint(&mut self.surface);
            self.present();
        }

        fn frame(&mut self, time: f64) {
            let elapsed_ms = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0)
            } else {
                0.0
            };
            self.last_time = time;

            let ticks = self
                .scheduler
                .advance(Duration::from_secs_f64(elapsed_ms / 1000.0), &mut self.surface);
            if ticks > 0 {
                self.present();
            }
        }

        /// Copy the framebuffer onto the canvas
        fn present(&self) {
            let size = self.surface.size();
            match ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(self.surface.as_raw()),
                size.width as u32,
                size.height as u32,
            ) {
                Ok(data) => {
                    let _ = self.ctx.put_image_data(&data, 0.0, 0.0);
                }
                Err(e) => log::warn!("Cannot build frame: {:?}", e),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bouncers starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::default();
        canvas.set_width(settings.width as u32);
        canvas.set_height(settings.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let surface = Framebuffer::new(settings.width as u32, settings.height as u32);
        let scheduler = Scheduler::new(settings, Box::new(WebAudio::new()));
        let host = Rc::new(RefCell::new(Host {
            scheduler,
            surface,
            ctx,
            last_time: 0.0,
        }));

        host.borrow_mut().start();

        setup_input_handlers(&canvas, host.clone());
        setup_visibility(host.clone());
        request_animation_frame(host);

        log::info!("Bouncers running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();

        // Key down: remember its text
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                host.borrow_mut()
                    .scheduler
                    .input_mut()
                    .key_pressed(&key_text(&event.key()));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: nothing held any more
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: KeyboardEvent| {
                host.borrow_mut().scheduler.input_mut().key_released();
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move, canvas-relative
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                host.borrow_mut()
                    .scheduler
                    .input_mut()
                    .mouse_moved(IVec2::new(event.offset_x(), event.offset_y()));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop when the page is hidden, start a fresh run when it comes back
    fn setup_visibility(host: Rc<RefCell<Host>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let document = web_sys::window().unwrap().document().unwrap();
            let mut h = host.borrow_mut();
            match document.visibility_state() {
                VisibilityState::Hidden => h.scheduler.stop(),
                _ => {
                    if !h.scheduler.is_running() {
                        h.start();
                    }
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            host.borrow_mut().frame(time);
            request_animation_frame(host);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;
    use std::time::Instant;

    use bouncers::audio::SilentAudio;
    use bouncers::renderer::{Framebuffer, Surface};
    use bouncers::{AssetProvider, DirectoryAssets, ProceduralAssets, Scheduler, Settings};

    env_logger::init();
    log::info!("Bouncers (native, headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    if let Err(e) = settings.validate() {
        log::error!("{e}");
        std::process::exit(1);
    }

    let provider: Box<dyn AssetProvider> = if settings.image_dir.is_dir() {
        Box::new(DirectoryAssets::from_settings(&settings))
    } else {
        log::info!(
            "No image directory at {}, using generated sprites",
            settings.image_dir.display()
        );
        Box::new(ProceduralAssets::default())
    };

    let mut surface = Framebuffer::new(settings.width as u32, settings.height as u32);
    let mut scheduler = Scheduler::new(settings.clone(), Box::new(SilentAudio::default()));
    if let Err(e) = scheduler.start(surface.size(), provider.as_ref()) {
        log::error!("{e}");
        std::process::exit(1);
    }

    // Poll loop: sleep until the next tick is due, then feed the elapsed time
    let mut last = Instant::now();
    while scheduler.tick_count < settings.run_ticks {
        std::thread::sleep(scheduler.period().saturating_sub(last.elapsed()));
        let now = Instant::now();
        scheduler.advance(now - last, &mut surface);
        last = now;
    }
    scheduler.stop();

    if let Some(sim) = scheduler.simulation() {
        match serde_json::to_string(sim.bouncers()) {
            Ok(json) => log::info!("Final bouncers: {json}"),
            Err(e) => log::warn!("Cannot serialize final state: {e}"),
        }
    }

    if let Some(path) = &settings.snapshot {
        scheduler.paint(&mut surface);
        match surface.save_png(path) {
            Ok(()) => log::info!("Wrote {}", path.display()),
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
