//! Builds a small service diagram from declarations and prints the drawing
//! commands the compiler produces.

use trellis::{
    Compiler, TrellisError,
    config::AppConfig,
    decl::{Attribute, AttributeValue, ClassDecl, Document, EndpointRef, LineDecl, ObjectDecl},
    draw::{DrawCommand, MonospaceMeasure, ShapeKind},
    geometry::{Border, Size},
    ir::ArrowDirection,
    span::{Name, Span},
};

fn name(text: &str) -> Name {
    Name::new(text, Span::default())
}

fn attr(value: AttributeValue) -> Attribute {
    Attribute::new(value, Span::default())
}

fn main() -> Result<(), TrellisError> {
    let config = AppConfig::from_toml_str(
        r#"
        [style]
        gutter = { row = 20.0, column = 40.0 }
        font_size = 12.0

        [layout]
        label_spacing = 8.0
        "#,
    )?;

    let service = ClassDecl::new(name("service"), Span::default())
        .with_attribute(attr(AttributeValue::Shape(Some(ShapeKind::RoundedRectangle))))
        .with_attribute(attr(AttributeValue::Rounding(6.0)))
        .with_attribute(attr(AttributeValue::Padding(Border::uniform(8.0))))
        .with_attribute(attr(AttributeValue::MinSize(Size::new(80.0, 40.0))));

    let node = |id: &str, label: &str| {
        ObjectDecl::new(Span::default())
            .named(name(id))
            .with_class(name("service"))
            .with_attribute(attr(AttributeValue::Label(label.to_string())))
    };

    let document = Document::new()
        .with(service)
        .with(node("web", "Web"))
        .with(node("api", "API"))
        .with(
            node("data", "Storage")
                .with_attribute(attr(AttributeValue::Row(2)))
                .with(node("db", "DB"))
                .with(node("cache", "Cache")),
        )
        .with(
            LineDecl::new(EndpointRef::new(name("web")), Span::default())
                .to(ArrowDirection::Forward, EndpointRef::new(name("api")))
                .to(ArrowDirection::Forward, EndpointRef::new(name("data"))),
        );

    let compiler = Compiler::with_text_measure(config, MonospaceMeasure::default());
    let compilation = compiler.compile(&document)?;

    for diagnostic in compilation.diagnostics() {
        eprintln!("{diagnostic}");
    }

    let diagram = compilation.diagram();
    println!("diagram {} x {}", diagram.width(), diagram.height());
    for command in diagram.commands() {
        match command {
            DrawCommand::Shape(shape) => println!("shape {} {:?}", shape.kind, shape.bounds),
            DrawCommand::Label(label) => {
                println!("label {:?} {:?}", label.text.content(), label.bounds)
            }
            DrawCommand::Line(line) => println!("line {:?} -> {:?}", line.start, line.end),
        }
    }
    Ok(())
}
