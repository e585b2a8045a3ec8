use std::fs;
use std::path::PathBuf;
use std::process;

use acse_core::core_api::{Engine, PlayerLayout, Session};
use acse_core::generation::Generation;
use acse_core::linked::HouseBeds;
use acse_core::record::{Field, FieldValue, PlayerRecord};
use acse_core::schema::{Schema, SchemaRegistry};
use clap::Parser;
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE")]
    path: PathBuf,
    #[arg(
        long,
        short = 'g',
        value_name = "dnm|af|ac|ww|cf|nl|wa",
        value_parser = parse_generation
    )]
    generation: Generation,
    /// JSON schema replacing the built-in one for --generation.
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    player: usize,
    #[arg(long = "save-data-start", value_name = "OFFSET", value_parser = parse_offset)]
    save_data_start: Option<usize>,
    #[arg(long = "first-offset", value_name = "OFFSET", value_parser = parse_offset)]
    first_offset: Option<usize>,
    #[arg(long, value_name = "BYTES", value_parser = parse_offset)]
    stride: Option<usize>,
    #[arg(long = "player-count", value_name = "N")]
    player_count: Option<usize>,
    #[arg(long)]
    name: bool,
    #[arg(long = "town-name")]
    town_name: bool,
    #[arg(long)]
    identifier: bool,
    #[arg(long)]
    gender: bool,
    #[arg(long)]
    bells: bool,
    #[arg(long)]
    birthday: bool,
    #[arg(long)]
    pockets: bool,
    #[arg(long)]
    reset: bool,
    #[arg(long)]
    json: bool,
    #[arg(long = "set-name")]
    set_name: Option<String>,
    #[arg(long = "set-bells")]
    set_bells: Option<u32>,
    #[arg(long = "set-gender")]
    set_gender: Option<u8>,
    #[arg(long = "set-reset")]
    set_reset: Option<bool>,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Re-encode the save without edits and check it matches the input.
    #[arg(long = "verify-roundtrip")]
    verify_roundtrip: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct FieldSelection {
    name: bool,
    town_name: bool,
    identifier: bool,
    gender: bool,
    bells: bool,
    birthday: bool,
    pockets: bool,
    reset: bool,
}

impl FieldSelection {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            name: cli.name,
            town_name: cli.town_name,
            identifier: cli.identifier,
            gender: cli.gender,
            bells: cli.bells,
            birthday: cli.birthday,
            pockets: cli.pockets,
            reset: cli.reset,
        }
    }

    fn is_field_mode(&self) -> bool {
        self.name
            || self.town_name
            || self.identifier
            || self.gender
            || self.bells
            || self.birthday
            || self.pockets
            || self.reset
    }

    fn selected_pairs(&self, player: &PlayerRecord) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        if self.name {
            out.push(("name", player.name().to_string()));
        }
        if self.town_name {
            out.push(("town_name", player.text(Field::TownName).to_string()));
        }
        if self.identifier {
            out.push(("identifier", format_identifier(player)));
        }
        if self.gender {
            out.push(("gender", player.byte(Field::Gender).to_string()));
        }
        if self.bells {
            out.push(("bells", format_bells(player)));
        }
        if self.birthday {
            out.push(("birthday", format_birthday(player)));
        }
        if self.pockets {
            let items: Vec<String> = player
                .pockets()
                .map(|inv| inv.items.iter().map(ToString::to_string).collect())
                .unwrap_or_default();
            out.push(("pockets", items.join(",")));
        }
        if self.reset {
            out.push((
                "reset",
                player
                    .flag(Field::Reset)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        out
    }

    fn selected_json(&self, player: &PlayerRecord) -> JsonMap<String, JsonValue> {
        let mut out = JsonMap::new();
        for (key, value) in self.selected_pairs(player) {
            let value = match key {
                "gender" => JsonValue::from(player.byte(Field::Gender)),
                "bells" if player.get(Field::Bells).is_some() => JsonValue::from(player.bells()),
                "reset" => player
                    .flag(Field::Reset)
                    .map_or(JsonValue::Null, JsonValue::from),
                "pockets" => JsonValue::Array(
                    value
                        .split(',')
                        .filter(|s| !s.is_empty())
                        .map(|s| JsonValue::String(s.to_string()))
                        .collect(),
                ),
                _ => JsonValue::String(value),
            };
            out.insert(key.to_string(), value);
        }
        out
    }
}

fn main() {
    let cli = Cli::parse();
    let fields = FieldSelection::from_cli(&cli);
    let has_edits = cli.set_name.is_some()
        || cli.set_bells.is_some()
        || cli.set_gender.is_some()
        || cli.set_reset.is_some();

    if has_edits && cli.output.is_none() {
        eprintln!("--set-* flags require --output <PATH>");
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one --set-* flag");
        process::exit(2);
    }

    let engine = build_engine(&cli);
    let layout = build_layout(&cli);

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });
    log::debug!("read {} bytes from {}", bytes.len(), cli.path.display());

    let mut session = engine
        .open(bytes, cli.generation, layout, HouseBeds::new())
        .unwrap_or_else(|e| {
            eprintln!("Error decoding save file: {}", cli.path.display());
            eprintln!("  {e}");
            process::exit(1);
        });

    if cli.verify_roundtrip {
        verify_roundtrip(&mut session);
    }

    if has_edits {
        apply_edits(&cli, &mut session);
    }

    if let Some(out_path) = cli.output.as_ref() {
        let edited_bytes = session.to_bytes_modified().unwrap_or_else(|e| {
            eprintln!("Error creating modified save bytes: {e}");
            process::exit(1);
        });
        fs::write(out_path, edited_bytes).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
    }

    let player = session.player(cli.player).unwrap_or_else(|e| {
        eprintln!("Error selecting player: {e}");
        process::exit(1);
    });

    if cli.json {
        let json = if fields.is_field_mode() {
            JsonValue::Object(fields.selected_json(player))
        } else {
            serde_json::to_value(player).unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            })
        };
        let rendered = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    if fields.is_field_mode() {
        for (key, value) in fields.selected_pairs(player) {
            println!("{key}={value}");
        }
        return;
    }

    if let Some(out_path) = cli.output.as_ref() {
        println!("Wrote edited save to {}", out_path.display());
        return;
    }

    print_summary(&session);
}

fn build_engine(cli: &Cli) -> Engine {
    let Some(path) = cli.schema.as_ref() else {
        return Engine::new();
    };

    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    let schema: Schema = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing schema {}: {e}", path.display());
        process::exit(1);
    });

    let mut registry = SchemaRegistry::builtin();
    registry.insert(cli.generation, schema);
    Engine::with_schemas(registry).unwrap_or_else(|e| {
        eprintln!("Error in schema {}: {e}", path.display());
        process::exit(1);
    })
}

fn build_layout(cli: &Cli) -> PlayerLayout {
    let defaults = PlayerLayout::for_generation(cli.generation);
    PlayerLayout {
        save_data_start: cli.save_data_start.unwrap_or(defaults.save_data_start),
        first_offset: cli.first_offset.unwrap_or(defaults.first_offset),
        stride: cli.stride.unwrap_or(defaults.stride),
        count: cli.player_count.unwrap_or(defaults.count),
    }
}

fn apply_edits(cli: &Cli, session: &mut Session) {
    let edits = [
        (Field::Name, cli.set_name.clone().map(FieldValue::Text)),
        (Field::Bells, cli.set_bells.map(FieldValue::U32)),
        (Field::Gender, cli.set_gender.map(FieldValue::Byte)),
        (Field::Reset, cli.set_reset.map(FieldValue::Flag)),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            session
                .set_field(cli.player, field, value)
                .unwrap_or_else(|e| {
                    eprintln!("Error applying {field} edit: {e}");
                    process::exit(1);
                });
        }
    }
}

fn verify_roundtrip(session: &mut Session) {
    let original = session.to_bytes_unmodified();
    let encoded = session.to_bytes_modified().unwrap_or_else(|e| {
        eprintln!("Error re-encoding save: {e}");
        process::exit(1);
    });

    let mismatches: Vec<usize> = original
        .iter()
        .zip(&encoded)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect();
    if let Some(first) = mismatches.first() {
        eprintln!(
            "Round trip changed {} bytes, first at {first:#x}",
            mismatches.len()
        );
        process::exit(1);
    }
    println!("roundtrip=ok");
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

fn format_identifier(player: &PlayerRecord) -> String {
    match player.get(Field::Identifier) {
        Some(FieldValue::U16(id)) => format!("{id:#06X}"),
        _ => "unknown".to_string(),
    }
}

fn format_bells(player: &PlayerRecord) -> String {
    if player.get(Field::Bells).is_some() {
        return player.bells().to_string();
    }
    match player.get(Field::NewLeafBells) {
        Some(FieldValue::Split(pair)) => format!("{:#010X}:{:#010X}", pair.int1, pair.int2),
        _ => "unknown".to_string(),
    }
}

fn format_birthday(player: &PlayerRecord) -> String {
    match player.get(Field::Birthday) {
        Some(FieldValue::Date(date)) => format!("{:02}-{:02}", date.month, date.day),
        _ => "unknown".to_string(),
    }
}

fn print_summary(session: &Session) {
    println!("{} save", session.generation());
    println!();
    for player in session.players() {
        if !player.exists() {
            println!("  Player {}: (empty)", player.index());
            continue;
        }
        println!(
            "  Player {}: {} of {}",
            player.index(),
            player.name(),
            player.text(Field::TownName)
        );
        println!("    Identifier: {}", format_identifier(player));
        println!("    Bells:      {}", format_bells(player));
        println!("    Birthday:   {}", format_birthday(player));
        let held = player
            .pockets()
            .map_or(0, |inv| inv.items.iter().filter(|i| i.id != 0).count());
        println!("    Pockets:    {held} items");
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

fn parse_generation(value: &str) -> Result<Generation, String> {
    value.parse::<Generation>().map_err(|e| e.to_string())
}

/// Accepts decimal or `0x`-prefixed hexadecimal.
fn parse_offset(value: &str) -> Result<usize, String> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => trimmed.parse::<usize>(),
    };
    parsed.map_err(|_| format!("invalid offset '{value}'; expected decimal or 0x-prefixed hex"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_accept_hex_and_decimal() {
        assert_eq!(parse_offset("0x228C"), Ok(0x228C));
        assert_eq!(parse_offset("12"), Ok(12));
        assert!(parse_offset("0xZZ").is_err());
    }

    #[test]
    fn generation_names_are_accepted() {
        assert_eq!(parse_generation("ww"), Ok(Generation::WildWorld));
        assert!(parse_generation("gamecube-two").is_err());
    }
}
