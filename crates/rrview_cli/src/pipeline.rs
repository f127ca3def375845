//! Shared command plumbing: configuration, input loading, diagnostics.
//!
//! Every command follows the same steps:
//!
//! 1. Load `rrview.toml` (explicit `--config`, else the working directory,
//!    else defaults)
//! 2. Read and ingest the routing-resource graph
//! 3. Read and ingest the route, then resolve it against the graph
//! 4. Resolve the layout (the route's declared array size, else the graph's
//!    extent, fills in rows/cols)
//! 5. Configure the coordinate mapper
//!
//! The command then runs its metric and prints a report; diagnostics go to
//! stderr afterwards.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use rrview_config::{load_config, load_config_file, ProjectConfig, CONFIG_FILE_NAME};
use rrview_diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticRenderer, DiagnosticSink, Location, Severity,
    TerminalRenderer,
};
use rrview_graph::ingest::{parse_route, parse_rrg, RrgFormat};
use rrview_graph::{Route, RoutingResourceGraph};
use rrview_layout::CoordinateMapper;
use serde::Serialize;

use crate::{GlobalArgs, InputArgs};

/// Everything a command needs, loaded and mapped.
pub struct Session {
    pub config: ProjectConfig,
    pub graph: RoutingResourceGraph,
    pub route: Route,
    pub mapper: CoordinateMapper,
    pub sink: DiagnosticSink,
}

/// Whether a command can run without a routing solution.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RouteInput {
    Required,
    Optional,
}

/// Loads the configuration and returns it with the directory its relative
/// paths are resolved against.
pub fn load_project_config(
    global: &GlobalArgs,
) -> Result<(ProjectConfig, PathBuf), Box<dyn Error>> {
    if let Some(path) = &global.config {
        let path = Path::new(path);
        let config = load_config_file(path)
            .map_err(|e| format!("cannot load {}: {e}", path.display()))?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        return Ok((config, base));
    }
    let cwd = std::env::current_dir()?;
    if cwd.join(CONFIG_FILE_NAME).is_file() {
        let config = load_config(&cwd).map_err(|e| format!("cannot load {CONFIG_FILE_NAME}: {e}"))?;
        Ok((config, cwd))
    } else {
        Ok((ProjectConfig::default(), cwd))
    }
}

/// Runs steps 1 to 5.
pub fn open_session(
    inputs: &InputArgs,
    route_input: RouteInput,
    global: &GlobalArgs,
) -> Result<Session, Box<dyn Error>> {
    let (config, base) = load_project_config(global)?;
    open_session_with(config, &base, inputs, route_input)
}

/// Steps 2 to 5 with an already loaded configuration.
pub fn open_session_with(
    config: ProjectConfig,
    base: &Path,
    inputs: &InputArgs,
    route_input: RouteInput,
) -> Result<Session, Box<dyn Error>> {
    let sink = DiagnosticSink::new();

    let rrg_path = input_path(inputs.rrg.as_deref(), config.inputs.rrg.as_deref(), base)
        .ok_or("no routing-resource graph given (use --rrg or [inputs] rrg)")?;
    let rrg_text = read(&rrg_path)?;
    let format = RrgFormat::from_path(&rrg_path).unwrap_or_else(|| RrgFormat::sniff(&rrg_text));
    let graph = parse_rrg(&rrg_text, format, &sink)
        .map_err(|e| format!("{}: {e}", rrg_path.display()))?;

    let route_path = input_path(inputs.route.as_deref(), config.inputs.route.as_deref(), base);
    let route = match (route_path, route_input) {
        (Some(path), _) => parse_route(&read(&path)?, &sink).resolve_against(&graph, &sink),
        (None, RouteInput::Optional) => Route::new(),
        (None, RouteInput::Required) => {
            return Err("no routing solution given (use --route or [inputs] route)".into())
        }
    };

    let array_size = route.array_size.or_else(|| {
        if config.layout.rows.is_some() && config.layout.cols.is_some() {
            return None;
        }
        let estimate = array_size_from_extent(&graph)?;
        sink.emit(Diagnostic::note(
            DiagnosticCode::SUMMARY,
            format!(
                "no array size declared; {}x{} estimated from node coordinates",
                estimate.0, estimate.1
            ),
            Location::None,
        ));
        Some(estimate)
    });
    let layout = config.layout.resolve(array_size);
    sink.emit(Diagnostic::note(
        DiagnosticCode::SUMMARY,
        format!(
            "{} nodes, {} edges, {} nets on a {}x{} array",
            graph.node_count(),
            graph.edge_count(),
            route.net_count(),
            layout.cols,
            layout.rows
        ),
        Location::None,
    ));

    let mut mapper = CoordinateMapper::new();
    mapper.configure(&graph, layout)?;

    Ok(Session {
        config,
        graph,
        route,
        mapper,
        sink,
    })
}

/// Logic-block array `(cols, rows)` implied by the graph's extent.
///
/// The extent counts columns and rows from the IO ring at 0 through the far
/// IO ring, which sits at index `cols` (`rows`), so the array is one short.
fn array_size_from_extent(graph: &RoutingResourceGraph) -> Option<(u32, u32)> {
    match graph.grid_extent() {
        (0, 0) => None,
        (width, height) => Some((width.saturating_sub(1).max(1), height.saturating_sub(1).max(1))),
    }
}

impl Session {
    /// Keeps only the nets with exactly `sinks` SINK hops, when given.
    pub fn restrict_fanout(&mut self, sinks: Option<usize>) {
        let Some(sinks) = sinks else {
            return;
        };
        let total = self.route.net_count();
        self.route = self.route.with_fanout(sinks);
        self.sink.emit(Diagnostic::note(
            DiagnosticCode::SUMMARY,
            format!(
                "{} of {total} nets have fanout {sinks}",
                self.route.net_count()
            ),
            Location::None,
        ));
    }
}

fn input_path(flag: Option<&str>, configured: Option<&str>, base: &Path) -> Option<PathBuf> {
    match (flag, configured) {
        (Some(path), _) => Some(PathBuf::from(path)),
        (None, Some(path)) => Some(base.join(path)),
        (None, None) => None,
    }
}

fn read(path: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

/// Renders the sink's diagnostics to stderr, filtered by `-q`/`-v`.
pub fn emit_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        if shown(diag.severity, global) {
            eprint!("{}", renderer.render(&diag));
        }
    }
}

fn shown(severity: Severity, global: &GlobalArgs) -> bool {
    match severity {
        Severity::Error => true,
        Severity::Warning => !global.quiet,
        Severity::Note => global.verbose && !global.quiet,
    }
}

/// Prints a report as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Exit code once a command has produced its report.
pub fn exit_code(sink: &DiagnosticSink) -> i32 {
    if sink.has_errors() {
        1
    } else {
        0
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn inputs(dir: &Path) -> InputArgs {
        InputArgs {
            rrg: Some(dir.join("device.json").display().to_string()),
            route: Some(dir.join("top.route").display().to_string()),
        }
    }

    #[test]
    fn session_from_flags() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());

        let session = open_session_with(
            ProjectConfig::default(),
            dir.path(),
            &inputs(dir.path()),
            RouteInput::Required,
        )
        .unwrap();
        assert_eq!(session.graph.node_count(), 8);
        assert_eq!(session.route.net_count(), 2);
        let layout = session.mapper.map().unwrap().layout();
        assert_eq!((layout.rows, layout.cols), (2, 2));
        assert!(!session.sink.has_errors());
        assert_eq!(session.sink.count_code(DiagnosticCode::SUMMARY), 1);
    }

    #[test]
    fn session_from_config_inputs() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[inputs]\nrrg = \"device.json\"\nroute = \"top.route\"\n\n[layout]\nrows = 4\n",
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        let session = open_session_with(
            config,
            dir.path(),
            &InputArgs::default(),
            RouteInput::Required,
        )
        .unwrap();
        let layout = session.mapper.map().unwrap().layout();
        assert_eq!((layout.rows, layout.cols), (4, 2));
    }

    #[test]
    fn missing_route_only_fatal_when_required() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let only_rrg = InputArgs {
            rrg: inputs(dir.path()).rrg,
            route: None,
        };

        let session = open_session_with(
            ProjectConfig::default(),
            dir.path(),
            &only_rrg,
            RouteInput::Optional,
        )
        .unwrap();
        assert_eq!(session.route.net_count(), 0);

        let err = open_session_with(
            ProjectConfig::default(),
            dir.path(),
            &only_rrg,
            RouteInput::Required,
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("no routing solution"));
    }

    #[test]
    fn unreadable_graph_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("device.json"), "not json").unwrap();
        let args = InputArgs {
            rrg: Some(dir.path().join("device.json").display().to_string()),
            route: None,
        };
        let err = open_session_with(ProjectConfig::default(), dir.path(), &args, RouteInput::Optional)
            .err()
            .unwrap();
        assert!(err.to_string().contains("malformed input"));

        let missing = InputArgs {
            rrg: Some(dir.path().join("absent.json").display().to_string()),
            route: None,
        };
        let err = open_session_with(ProjectConfig::default(), dir.path(), &missing, RouteInput::Optional)
            .err()
            .unwrap();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn xml_device_by_extension_or_content() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        fs::write(dir.path().join("device.xml"), RRG_XML).unwrap();
        fs::write(dir.path().join("device.rrg"), RRG_XML).unwrap();

        for name in ["device.xml", "device.rrg"] {
            let args = InputArgs {
                rrg: Some(dir.path().join(name).display().to_string()),
                route: inputs(dir.path()).route,
            };
            let session =
                open_session_with(ProjectConfig::default(), dir.path(), &args, RouteInput::Required)
                    .unwrap();
            assert_eq!(session.graph.node_count(), 8, "{name}");
            assert_eq!(session.graph.edge_count(), 4, "{name}");
            assert!(!session.sink.has_errors(), "{name}");
        }
    }

    #[test]
    fn array_size_falls_back_to_graph_extent() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let undeclared = ROUTE.replace("Array size: 2 x 2 logic blocks\n", "");
        fs::write(dir.path().join("top.route"), undeclared).unwrap();

        let session = open_session_with(
            ProjectConfig::default(),
            dir.path(),
            &inputs(dir.path()),
            RouteInput::Required,
        )
        .unwrap();
        assert_eq!(session.route.array_size, None);
        let layout = session.mapper.map().unwrap().layout();
        assert_eq!((layout.cols, layout.rows), (2, 2));
        assert!(session
            .sink
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("estimated from node coordinates")));
    }

    #[test]
    fn fanout_restricts_measured_nets() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let mut session = open_session_with(
            ProjectConfig::default(),
            dir.path(),
            &inputs(dir.path()),
            RouteInput::Required,
        )
        .unwrap();

        session.restrict_fanout(None);
        assert_eq!(session.route.net_count(), 2);
        session.restrict_fanout(Some(1));
        assert_eq!(session.route.net_count(), 2);
        session.restrict_fanout(Some(2));
        assert_eq!(session.route.net_count(), 0);
        assert_eq!(session.route.array_size, Some((2, 2)));
        assert!(session
            .sink
            .diagnostics()
            .iter()
            .any(|d| d.message == "0 of 2 nets have fanout 2"));
    }

    #[test]
    fn severity_filter() {
        let global = |quiet, verbose| GlobalArgs {
            quiet,
            verbose,
            color: false,
            config: None,
        };
        assert!(shown(Severity::Error, &global(true, false)));
        assert!(!shown(Severity::Warning, &global(true, false)));
        assert!(shown(Severity::Warning, &global(false, false)));
        assert!(!shown(Severity::Note, &global(false, false)));
        assert!(shown(Severity::Note, &global(false, true)));
    }
}
