use std::env;
use std::fs;
use std::process;

use slidechart::{
    chart_from_yaml, chart_to_yaml, read_chart_file, samples_to_yaml, simulate_playback,
    write_chart_file, ChartFile, EditorConfig,
};

const USAGE: &str = "Usage: slidechart inspect <chart>
       slidechart export <chart> [output.yaml]
       slidechart import <input.yaml> <chart>
       slidechart [--config <editor.yaml>] scrub <chart> [seconds] [fps]";

fn main() {
    env_logger::init();

    let argv: Vec<String> = env::args().collect();
    let mut args: &[String] = argv.get(1..).unwrap_or(&[]);

    // Parse flags
    let mut config = EditorConfig::default();
    if args.first().map(String::as_str) == Some("--config") {
        let Some(path) = args.get(1) else {
            fail(USAGE);
        };
        config = match EditorConfig::load(path) {
            Ok(config) => config,
            Err(e) => fail(&format!("Error reading config '{}': {}", path, e)),
        };
        args = &args[2..];
    }

    match args {
        [cmd, chart] if cmd == "inspect" => inspect(chart),
        [cmd, chart, rest @ ..] if cmd == "export" && rest.len() <= 1 => {
            export(chart, rest.first())
        }
        [cmd, input, chart] if cmd == "import" => import(input, chart),
        [cmd, chart, rest @ ..] if cmd == "scrub" && rest.len() <= 2 => {
            let seconds = parse_number(rest.first(), 10.0, "seconds");
            let fps = parse_number(rest.get(1), 60.0, "fps");
            scrub(chart, config, seconds, fps)
        }
        _ => fail(USAGE),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn parse_number(arg: Option<&String>, default: f32, name: &str) -> f32 {
    match arg {
        None => default,
        Some(s) => match s.parse() {
            Ok(value) => value,
            Err(_) => fail(&format!("Invalid {}: '{}'", name, s)),
        },
    }
}

fn load(path: &str) -> ChartFile {
    match read_chart_file(path) {
        Ok(chart) => chart,
        Err(e) => fail(&format!("Error reading chart '{}': {}", path, e)),
    }
}

fn inspect(path: &str) {
    let chart = load(path);
    println!("tempo:          {}", chart.tempo);
    println!("time signature: {}", chart.time_signature);
    println!("endpoint:       {}", chart.endpoint);
    println!("note spacing:   {}", chart.note_spacing);
    println!("colors:         {:?} -> {:?}", chart.note_color_start, chart.note_color_end);
    println!("background:     {} entries", chart.background.len());
    println!("lyrics:         {} entries", chart.lyric_texts.len());
    println!("notes:          {}", chart.notes.len());
    for (i, record) in chart.notes.iter().enumerate() {
        let (start, end) = (record.start(), record.end());
        println!(
            "  {:>4}  ({:.3}, {:.3}) -> ({:.3}, {:.3})",
            i, start.x, start.y, end.x, end.y
        );
    }
}

fn export(path: &str, output_path: Option<&String>) {
    let chart = load(path);
    let yaml = match chart_to_yaml(&chart) {
        Ok(yaml) => yaml,
        Err(e) => fail(&format!("Export error: {}", e)),
    };

    // Output
    match output_path {
        Some(out) => {
            if let Err(e) = fs::write(out, &yaml) {
                fail(&format!("Error writing to '{}': {}", out, e));
            }
            eprintln!("Wrote YAML to {}", out);
        }
        None => {
            print!("{}", yaml);
        }
    }
}

fn import(input_path: &str, chart_path: &str) {
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => fail(&format!("Error reading file '{}': {}", input_path, e)),
    };
    let chart = match chart_from_yaml(&source) {
        Ok(chart) => chart,
        Err(e) => fail(&format!("Import error: {}", e)),
    };
    if let Err(e) = write_chart_file(chart_path, &chart) {
        fail(&format!("Error writing to '{}': {}", chart_path, e));
    }
    eprintln!("Wrote chart to {}", chart_path);
}

fn scrub(path: &str, config: EditorConfig, seconds: f32, fps: f32) {
    let chart = load(path);
    let samples = match simulate_playback(chart, config, seconds, fps) {
        Ok(samples) => samples,
        Err(e) => fail(&format!("Playback error: {}", e)),
    };

    match samples_to_yaml(&samples) {
        Ok(yaml) => print!("{}", yaml),
        Err(e) => fail(&format!("Export error: {}", e)),
    }
}
