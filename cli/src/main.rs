use clap::Parser;
use log::info;
use oxigraph::io::RdfFormat;
use oxigraph::model::{NamedNode, Term};
use shacl_shapes::{ShaclGraph, ShapesGraph, ValidatorRegistry};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
struct ShapesArgs {
    /// Path to the shapes file
    #[arg(short, long, value_name = "FILE")]
    shapes_file: PathBuf,
}

#[derive(Parser, Debug)]
struct DataArgs {
    /// Path to the data file
    #[arg(short, long, value_name = "FILE")]
    data_file: PathBuf,
}

#[derive(Parser)]
struct ComponentsArgs {
    #[clap(flatten)]
    shapes: ShapesArgs,
}

#[derive(Parser)]
struct ShapesCmdArgs {
    #[clap(flatten)]
    shapes: ShapesArgs,
}

#[derive(Parser)]
struct TargetsArgs {
    #[clap(flatten)]
    shapes: ShapesArgs,
    #[clap(flatten)]
    data: DataArgs,
}

#[derive(Parser)]
struct ValuesArgs {
    #[clap(flatten)]
    shapes: ShapesArgs,
    #[clap(flatten)]
    data: DataArgs,

    /// IRI of the shape whose path to evaluate
    #[arg(long, value_name = "IRI")]
    shape: String,

    /// IRI of the focus node to start from
    #[arg(long, value_name = "IRI")]
    focus: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List the constraint components defined in the shapes graph
    Components(ComponentsArgs),
    /// List the shapes that declare targets
    Shapes(ShapesCmdArgs),
    /// Resolve the target nodes of every shape with a target against the data
    Targets(TargetsArgs),
    /// Resolve the value nodes of a shape from a focus node
    Values(ValuesArgs),
}

fn load_graph(path: &Path) -> Result<Rc<ShaclGraph>, Box<dyn Error>> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(RdfFormat::from_extension)
        .unwrap_or(RdfFormat::Turtle);
    let file = File::open(path)
        .map_err(|e| format!("failed to open '{}': {}", path.display(), e))?;
    info!("loading {} as {}", path.display(), format);
    Ok(Rc::new(ShaclGraph::from_reader(
        format,
        BufReader::new(file),
    )?))
}

fn build_shapes_graph(path: &Path) -> Result<ShapesGraph, Box<dyn Error>> {
    let graph = load_graph(path)?;
    Ok(ShapesGraph::new(graph, ValidatorRegistry::new())?)
}

fn parse_iri(value: &str) -> Result<Term, Box<dyn Error>> {
    let iri = value.trim_start_matches('<').trim_end_matches('>');
    Ok(NamedNode::new(iri)?.into())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Components(args) => {
            let shapes_graph = build_shapes_graph(&args.shapes.shapes_file)?;
            for component in shapes_graph.components() {
                println!("{}", component.node());
                for parameter in component.parameters() {
                    let optional = if component.is_optional(parameter) {
                        " (optional)"
                    } else {
                        ""
                    };
                    println!("  parameter {}{}", parameter, optional);
                }
            }
        }
        Commands::Shapes(args) => {
            let shapes_graph = build_shapes_graph(&args.shapes.shapes_file)?;
            for shape in shapes_graph.get_shapes_with_target()? {
                let kind = if shape.is_property_shape() {
                    "property shape"
                } else {
                    "node shape"
                };
                println!(
                    "{}\t{}\tseverity={}\tdeactivated={}\tconstraints={}",
                    shape.shape_node(),
                    kind,
                    shape.severity(),
                    shape.deactivated(),
                    shape.get_constraints().len()
                );
            }
        }
        Commands::Targets(args) => {
            let shapes_graph = build_shapes_graph(&args.shapes.shapes_file)?;
            let data = load_graph(&args.data.data_file)?;
            for shape in shapes_graph.get_shapes_with_target()? {
                println!("{}", shape.shape_node());
                for target in shape.get_target_nodes(&data)? {
                    println!("  {}", target);
                }
            }
        }
        Commands::Values(args) => {
            let shapes_graph = build_shapes_graph(&args.shapes.shapes_file)?;
            let data = load_graph(&args.data.data_file)?;
            let shape = shapes_graph.get_shape(&parse_iri(&args.shape)?)?;
            let focus = parse_iri(&args.focus)?;
            for value in shape.get_value_nodes(&focus, &data)? {
                println!("{}", value);
            }
        }
    }
    Ok(())
}
