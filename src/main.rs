/*!
# Fusion Lens CLI

Command-line interface for inspecting merged component trees.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;

use fusion_lens::cli_common::{
    self, fragments_root, init_logging, load_settings, print_error, print_success, print_warning, CommonArgs,
    OutputWriter, SourceArgs,
};
use fusion_lens::{AnatomyNode, DirectorySource, Inspector, ResolveStatus, ResolvedComposition};

#[derive(Parser)]
#[command(
    name = "fusion-lens",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspector for merged Fusion component trees: listings, reverse-compiled source and anatomy"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// List packages found in the fragments directory
    Packages,

    /// List styleguide objects grouped by structure, hidden entries removed
    List {
        /// List every prototype with its anatomy instead of the styleguide catalog
        #[arg(long)]
        all: bool,
    },

    /// Print the reverse-compiled source of a prototype
    Render {
        /// Prototype name, e.g. Vendor.Site:Atom.Button
        prototype: Option<String>,

        /// Render the path tree instead of a prototype
        #[arg(long, conflicts_with = "prototype")]
        paths: bool,
    },

    /// Show which prototypes a prototype is composed of
    Anatomy {
        prototype: String,

        /// Expand referenced prototypes transitively
        #[arg(long)]
        resolve: bool,

        /// Depth budget for --resolve (defaults to maxDepth from settings)
        #[arg(long, requires = "resolve")]
        depth: Option<usize>,
    },

    /// Full detail view of a prototype: source, parsed AST and anatomy
    Detail { prototype: String },

    /// Show the structure group and visibility of prototype names
    Classify {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show viewport and locale presets of the package
    Presets,

    /// Check the settings file for problems
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.common.verbose) {
        eprintln!("{}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let started = Instant::now();
    let settings = load_settings(cli.source.config.as_deref())?;
    let mut out = OutputWriter::stdout(cli.common.format).with_pretty(cli.common.pretty);

    if let Commands::Validate = cli.command {
        return validate_command(&settings, &mut out);
    }

    let root = fragments_root(cli.source.fragments.as_deref(), &settings)?;
    let inspector = Inspector::new(DirectorySource::new(&root), settings);

    if let Commands::Packages = cli.command {
        let packages = inspector.packages().context("Failed to list packages")?;
        return packages_command(&packages, &mut out);
    }

    let package = inspector.resolve_package(cli.source.package.as_deref())?;
    info!("Inspecting package {} from {}", package, root.display());

    match cli.command {
        Commands::List { all: false } => list_command(&inspector, &package, &mut out)?,
        Commands::List { all: true } => list_all_command(&inspector, &package, &mut out)?,
        Commands::Render { paths: true, .. } => {
            let tree = inspector.merged_tree(&package)?;
            let text = inspector.compiler().render_paths(&tree.paths)?;
            write_source(&mut out, "paths", &text)?;
        }
        Commands::Render { prototype: Some(name), .. } => {
            let text = inspector
                .render_prototype(&package, &name)
                .with_context(|| format!("Failed to render {}", name))?;
            write_source(&mut out, &name, &text)?;
        }
        Commands::Render { prototype: None, .. } => {
            anyhow::bail!("Pass a prototype name or --paths");
        }
        Commands::Anatomy {
            prototype,
            resolve: false,
            ..
        } => {
            let detail = inspector.prototype_detail(&package, &prototype)?;
            if out.is_structured() {
                out.write_object(&detail.anatomy)?;
            } else {
                if let Some(parent) = &detail.anatomy.extends {
                    out.write_line(&format!("{} < {}", prototype.bold(), parent))?;
                } else {
                    out.write_line(&prototype.bold().to_string())?;
                }
                write_anatomy_tree(&mut out, &detail.anatomy_tree, 1)?;
            }
        }
        Commands::Anatomy {
            prototype,
            resolve: true,
            depth,
        } => {
            let resolved = match depth {
                Some(depth) => inspector.resolve_anatomy_with_depth(&package, &prototype, depth)?,
                None => inspector.resolve_anatomy(&package, &prototype)?,
            };
            if out.is_structured() {
                out.write_object(&resolved)?;
            } else {
                write_resolved(&mut out, &resolved, 0)?;
            }
        }
        Commands::Detail { prototype } => {
            let detail = inspector.prototype_detail(&package, &prototype)?;
            if out.is_structured() {
                out.write_object(&detail)?;
            } else {
                out.write_header(&detail.prototype_name)?;
                out.write_line(&detail.rendered_code)?;
                out.write_header("Parsed")?;
                out.write_line(&detail.parsed_code)?;
                out.write_header("Anatomy")?;
                write_anatomy_tree(&mut out, &detail.anatomy_tree, 0)?;
            }
        }
        Commands::Classify { names } => {
            let classifier = inspector.classifier(&package)?;
            let rows: Vec<ClassifiedName> = names
                .iter()
                .map(|name| ClassifiedName {
                    name: name.clone(),
                    structure: classifier.classify(name),
                    hidden: classifier.is_hidden(name),
                })
                .collect();
            if out.is_structured() {
                out.write_object(&rows)?;
            } else {
                let table = rows
                    .into_iter()
                    .map(|row| {
                        vec![
                            row.name,
                            row.structure.label,
                            row.structure.icon,
                            if row.hidden { "hidden".to_string() } else { String::new() },
                        ]
                    })
                    .collect();
                out.write_table(&["Prototype", "Structure", "Icon", ""], table)?;
            }
        }
        Commands::Presets => {
            let presets = Presets {
                viewport_presets: inspector.viewport_presets(&package),
                locale_presets: inspector.locale_presets(&package),
            };
            if out.is_structured() {
                out.write_object(&presets)?;
            } else {
                out.write_header("Viewport presets")?;
                for (key, preset) in &presets.viewport_presets {
                    let size = match (preset.width, preset.height) {
                        (Some(w), Some(h)) => format!("{}x{}", w, h),
                        (Some(w), None) => format!("{}w", w),
                        (None, Some(h)) => format!("{}h", h),
                        (None, None) => "auto".to_string(),
                    };
                    out.write_list_item(&format!("{} ({}): {}", preset.label, key, size))?;
                }
                out.write_header("Locale presets")?;
                for (key, preset) in &presets.locale_presets {
                    out.write_list_item(&format!("{} ({}): {}", preset.label, key, preset.fallback.join(", ")))?;
                }
            }
        }
        Commands::Packages | Commands::Validate => {}
    }

    out.flush()?;
    info!("Done in {}", cli_common::format_duration(started.elapsed()));
    Ok(())
}

#[derive(serde::Serialize)]
struct ClassifiedName {
    name: String,
    structure: fusion_lens::Structure,
    hidden: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Presets {
    viewport_presets: indexmap::IndexMap<String, fusion_lens::ViewportPreset>,
    locale_presets: indexmap::IndexMap<String, fusion_lens::LocalePreset>,
}

fn packages_command(packages: &[String], out: &mut OutputWriter) -> Result<()> {
    if out.is_structured() {
        out.write_object(&packages)?;
    } else {
        for package in packages {
            out.write_line(package)?;
        }
    }
    out.flush()
}

fn validate_command(settings: &fusion_lens::Settings, out: &mut OutputWriter) -> Result<()> {
    let warnings = settings.validate();
    if out.is_structured() {
        out.write_object(&warnings)?;
    } else if warnings.is_empty() {
        print_success("Settings are valid");
    } else {
        for warning in &warnings {
            print_warning(warning);
        }
    }
    out.flush()
}

fn list_command<S: fusion_lens::FragmentSource>(
    inspector: &Inspector<S>,
    package: &str,
    out: &mut OutputWriter,
) -> Result<()> {
    let objects = inspector.catalog(package)?;
    if out.is_structured() {
        return out.write_object(&objects);
    }

    let rows = objects
        .iter()
        .map(|(name, object)| {
            let structure = object.structure.as_ref().map(|s| s.label.clone()).unwrap_or_default();
            vec![structure, name.clone(), object.title.clone()]
        })
        .collect();
    out.write_table(&["Structure", "Prototype", "Title"], rows)?;
    out.write_line(&format!("\n{} styleguide objects in {}", objects.len(), package).dimmed().to_string())
}

fn list_all_command<S: fusion_lens::FragmentSource>(
    inspector: &Inspector<S>,
    package: &str,
    out: &mut OutputWriter,
) -> Result<()> {
    let listed = inspector.prototypes(package)?;
    if out.is_structured() {
        return out.write_object(&listed);
    }

    let rows = listed
        .iter()
        .map(|(name, listing)| {
            vec![
                name.clone(),
                listing.anatomy.extends.clone().unwrap_or_default(),
                listing.anatomy.referenced_prototypes().join(", "),
            ]
        })
        .collect();
    out.write_table(&["Prototype", "Extends", "Composed of"], rows)
}

fn write_source(out: &mut OutputWriter, name: &str, text: &str) -> Result<()> {
    if out.is_structured() {
        let mut map = indexmap::IndexMap::new();
        map.insert(name.to_string(), text.to_string());
        out.write_object(&map)
    } else {
        out.write_line(text.trim_end())
    }
}

fn write_anatomy_tree(out: &mut OutputWriter, nodes: &[AnatomyNode], depth: usize) -> Result<()> {
    for node in nodes {
        out.write_line(&format!(
            "{}{} {} {}",
            "  ".repeat(depth),
            node.role.cyan(),
            "→".dimmed(),
            node.prototype_name
        ))?;
        write_anatomy_tree(out, &node.children, depth + 1)?;
    }
    Ok(())
}

fn write_resolved(out: &mut OutputWriter, resolved: &ResolvedComposition, depth: usize) -> Result<()> {
    let marker = match resolved.status {
        ResolveStatus::Expanded => String::new(),
        ResolveStatus::Revisited => " (seen)".dimmed().to_string(),
        ResolveStatus::DepthLimit => " (depth limit)".yellow().to_string(),
        ResolveStatus::Unresolved => " (unresolved)".red().to_string(),
    };
    let label = match &resolved.role {
        Some(role) => format!("{} {} {}", role.cyan(), "→".dimmed(), resolved.prototype_name),
        None => resolved.prototype_name.bold().to_string(),
    };
    let extends = resolved
        .extends
        .as_ref()
        .map(|parent| format!(" < {}", parent))
        .unwrap_or_default();
    out.write_line(&format!("{}{}{}{}", "  ".repeat(depth), label, extends, marker))?;
    for child in &resolved.composed_of {
        write_resolved(out, child, depth + 1)?;
    }
    Ok(())
}
