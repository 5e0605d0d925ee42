use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;
use typekit_i18n::{
    IcuTranslatorOptions, MessageRenderer, MissingStrategy, Placeholder, PlaceholderValue,
    PluralKind, RenderContext, TranslationTable, Translator, load_settings_from_file,
    load_table_from_dir, load_table_from_file, locale::parse_locale, plural_categories,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn placeholder_arg() -> Arg {
    Arg::new("set")
        .long("set")
        .short('s')
        .value_name("NAME=VALUE")
        .help("Placeholder value; numbers and true/false are typed, anything else is a string")
        .action(ArgAction::Append)
}

fn language_arg() -> Arg {
    Arg::new("lang")
        .long("lang")
        .short('l')
        .help("Language to render (default: the default language)")
}

fn cli() -> Command {
    Command::new("typekit-i18n")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render and check ICU message templates")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log fallback resolution and cache activity")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate a key from a table")
                .arg(
                    Arg::new("table")
                        .help("Table JSON file, or a directory of per-language JSON files")
                        .required(true)
                        .index(1),
                )
                .arg(Arg::new("key").help("Translation key").required(true).index(2))
                .arg(language_arg())
                .arg(
                    Arg::new("default-lang")
                        .long("default-lang")
                        .short('d')
                        .help("Default language (default: en)"),
                )
                .arg(
                    Arg::new("settings")
                        .long("settings")
                        .help("Translator settings JSON file"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail on missing translations")
                        .action(ArgAction::SetTrue),
                )
                .arg(placeholder_arg()),
        )
        .subcommand(
            Command::new("render")
                .about("Render a single template")
                .arg(Arg::new("template").required(true).index(1))
                .arg(language_arg().default_value("en"))
                .arg(placeholder_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Compile every template in a table and report syntax errors")
                .arg(Arg::new("table").required(true).index(1)),
        )
        .subcommand(
            Command::new("categories")
                .about("List the plural categories a locale uses")
                .arg(Arg::new("locale").required(true).index(1))
                .arg(
                    Arg::new("ordinal")
                        .long("ordinal")
                        .help("Ordinal instead of cardinal categories")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_value(raw: &str) -> PlaceholderValue {
    match raw {
        "true" => PlaceholderValue::Boolean(true),
        "false" => PlaceholderValue::Boolean(false),
        _ => raw
            .parse::<f64>()
            .map(PlaceholderValue::Number)
            .unwrap_or_else(|_| PlaceholderValue::from(raw)),
    }
}

fn parse_placeholder(matches: &ArgMatches) -> CliResult<Placeholder> {
    let mut placeholder = Placeholder::new();
    for assignment in matches.get_many::<String>("set").into_iter().flatten() {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| format!("Expected NAME=VALUE, got \"{}\"", assignment))?;
        placeholder.push(name.trim(), parse_value(raw));
    }
    Ok(placeholder)
}

fn load_table(path: &str) -> CliResult<TranslationTable> {
    let path = Path::new(path);
    let table = if path.is_dir() {
        load_table_from_dir(path)?
    } else {
        load_table_from_file(path)?
    };
    Ok(table)
}

fn run_translate(matches: &ArgMatches) -> CliResult<()> {
    let table = load_table(required(matches, "table")?)?;
    let key = required(matches, "key")?;

    let mut options = match matches.get_one::<String>("settings") {
        Some(path) => IcuTranslatorOptions::from(load_settings_from_file(Path::new(path))?),
        None => IcuTranslatorOptions::new("en"),
    };
    if let Some(default_language) = matches.get_one::<String>("default-lang") {
        options.default_language = default_language.clone();
    }
    if matches.get_flag("strict") {
        options.missing_strategy = MissingStrategy::Strict;
    }
    options = options.on_missing_translation(|event| {
        eprintln!(
            "Warning: missing translation for \"{}\" in \"{}\" ({})",
            event.key, event.language, event.reason
        );
    });

    let mut translator = Translator::new(&table, options);
    if let Some(language) = matches.get_one::<String>("lang") {
        translator.set_language(language.as_str());
    }
    debug!(key, language = translator.language(), "translating");

    let placeholder = parse_placeholder(matches)?;
    println!("{}", translator.translate_with(key, &placeholder)?);
    Ok(())
}

fn run_render(matches: &ArgMatches) -> CliResult<()> {
    let template = required(matches, "template")?;
    let language = required(matches, "lang")?;
    let values = parse_placeholder(matches)?.to_map();

    let context = RenderContext::new("cli-message", language, &values);
    println!("{}", MessageRenderer::new().render(template, &context)?);
    Ok(())
}

fn run_validate(matches: &ArgMatches) -> CliResult<()> {
    let table = load_table(required(matches, "table")?)?;
    let translator = Translator::new(&table, IcuTranslatorOptions::new("en"));
    let errors = translator.validate();
    if errors.is_empty() {
        println!("{} keys, no syntax errors", table.len());
        return Ok(());
    }
    for error in &errors {
        eprintln!("{}", error);
    }
    Err(format!("{} templates failed to compile", errors.len()).into())
}

fn run_categories(matches: &ArgMatches) -> CliResult<()> {
    let locale = parse_locale(required(matches, "locale")?);
    let kind = if matches.get_flag("ordinal") {
        PluralKind::Ordinal
    } else {
        PluralKind::Cardinal
    };
    println!("{}", plural_categories(&locale, kind).join(", "));
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> CliResult<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing argument <{}>", name).into())
}

fn main() -> CliResult<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("translate", sub)) => run_translate(sub),
        Some(("render", sub)) => run_render(sub),
        Some(("validate", sub)) => run_validate(sub),
        Some(("categories", sub)) => run_categories(sub),
        _ => Err("Unknown command".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("3"), PlaceholderValue::Number(3.0));
        assert_eq!(parse_value("true"), PlaceholderValue::Boolean(true));
        assert_eq!(parse_value("Ann"), PlaceholderValue::from("Ann"));
    }

    #[test]
    fn test_parse_placeholder() {
        let matches = cli().get_matches_from([
            "typekit-i18n",
            "render",
            "{n} {who}",
            "--set",
            "n=2",
            "-s",
            "who=me",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let placeholder = parse_placeholder(sub).unwrap();
        assert_eq!(placeholder.0.len(), 2);
        assert_eq!(placeholder.0[1].key, "who");
    }
}
