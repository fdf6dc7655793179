#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("motion_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use folio_motion::MotionEngine;
    use folio_motion::config::MotionConfig;
    use folio_motion::scroll::VirtualViewport;

    const USAGE: &str = r#"motion_cli (folio-motion)

USAGE:
  motion_cli sections [options]
  motion_cli elements [options]
  motion_cli trace <element-id> [options]

OPTIONS:
  --viewport <px>    Viewport height (default 900)
  --from <px>        First scroll offset of the trace (default 0)
  --to <px>          Last scroll offset of the trace (default 4200)
  --step <px>        Scroll distance per sample (default 300)
  --interval <ms>    Time between samples (default 16)
  -h, --help         Show this help
"#;

    struct Options {
        viewport_height: f64,
        from: f64,
        to: f64,
        step: f64,
        interval_ms: f64,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                viewport_height: MotionConfig::default().viewport_height,
                from: 0.0,
                to: 4_200.0,
                step: 300.0,
                interval_ms: 16.0,
            }
        }
    }

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "sections" => {
                let engine = build_engine(&parse_options(&mut args)?)?;
                cmd_sections(&engine);
                Ok(())
            }
            "elements" => {
                let engine = build_engine(&parse_options(&mut args)?)?;
                cmd_elements(&engine);
                Ok(())
            }
            "trace" => {
                let element = args.next().ok_or("missing element id")?;
                let options = parse_options(&mut args)?;
                cmd_trace(&element, &options)
            }
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn parse_options(args: &mut Args) -> Result<Options, String> {
        let mut options = Options::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--viewport" => options.viewport_height = args.number("--viewport")?,
                "--from" => options.from = args.number("--from")?,
                "--to" => options.to = args.number("--to")?,
                "--step" => options.step = args.number("--step")?,
                "--interval" => options.interval_ms = args.number("--interval")?,
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if options.step <= 0.0 {
            return Err("--step must be greater than zero".to_string());
        }
        if options.to < options.from {
            return Err("--to must not be smaller than --from".to_string());
        }
        Ok(options)
    }

    fn build_engine(options: &Options) -> Result<MotionEngine, String> {
        let config = MotionConfig {
            viewport_height: options.viewport_height,
            ..MotionConfig::default()
        };
        MotionEngine::with_config(config).map_err(|err| err.to_string())
    }

    fn cmd_sections(engine: &MotionEngine) {
        println!("{:<10} {:>10} {:>10}", "section", "start", "end");
        for (name, range) in engine.scene().sections() {
            println!(
                "{:<10} {:>10.1} {:>10.1}",
                name, range.start_trigger, range.end_trigger
            );
        }
    }

    fn cmd_elements(engine: &MotionEngine) {
        for element in engine.scene().elements() {
            let parameters: Vec<&str> = element
                .bindings
                .iter()
                .map(|(parameter, _)| parameter.name())
                .collect();
            println!(
                "{:<20} {:<10} {}",
                element.id,
                element.section,
                parameters.join(", ")
            );
        }
    }

    fn cmd_trace(element_id: &str, options: &Options) -> Result<(), String> {
        let mut engine = build_engine(options)?;
        let element = engine
            .scene()
            .element(element_id)
            .ok_or_else(|| format!("unknown element `{element_id}`"))?;
        let section = element.section.clone();
        let parameters: Vec<_> = element.bindings.iter().map(|(parameter, _)| *parameter).collect();

        let viewport = VirtualViewport::new();
        let _mount = engine
            .mount_signal(&viewport)
            .map_err(|err| err.to_string())?;

        print!("{:>8} {:>6} {:>8} {:>8}", "offset", "dir", "speed", "progress");
        for parameter in &parameters {
            print!(" {:>10}", parameter.name());
        }
        println!();

        let mut offset = options.from;
        let mut now_ms = 0.0;
        while offset <= options.to {
            now_ms += options.interval_ms;
            viewport.scroll_to(offset, now_ms);
            engine.advance_clock(options.interval_ms / 1_000.0);

            let state = engine.sampler().state();
            let progress = engine.section_progress(&section).unwrap_or_default();
            let params = engine
                .scene()
                .compute_element(element_id, &state, &engine.clock())
                .unwrap_or_default();

            print!(
                "{:>8.1} {:>6} {:>8.3} {:>8.3}",
                state.offset_y,
                format!("{:?}", state.direction).to_lowercase(),
                state.speed_px_per_ms,
                progress
            );
            for parameter in &parameters {
                match params.get(*parameter) {
                    Some(value) => print!(" {value:>10.4}"),
                    None => print!(" {:>10}", "-"),
                }
            }
            println!();

            offset += options.step;
        }

        Ok(())
    }

    struct Args {
        inner: std::vec::IntoIter<String>,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self {
                inner: args.into_iter(),
            }
        }

        fn next(&mut self) -> Option<String> {
            self.inner.next()
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }

        fn number(&mut self, flag: &str) -> Result<f64, String> {
            let raw = self.value(flag)?;
            let value: f64 = raw
                .parse()
                .map_err(|_| format!("{flag} expects a number, got `{raw}`"))?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(format!("{flag} expects a finite number, got `{raw}`"))
            }
        }
    }
}
