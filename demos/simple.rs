use conflang::parse_named;

fn main() {
    let source = r"
        port is 8080;
        struct {
            user = struct {
                name = 'John Doe',
                email = 'john.doe@example.com'
            },
            port = #(port)
        }
    ";

    match parse_named(source, "example.conf") {
        Ok(document) => match document.to_yaml() {
            Ok(yaml) => println!("Converted to YAML:\n{yaml}"),
            Err(e) => eprintln!("Failed to render YAML: {e}"),
        },
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
        }
    }
}
