pub enum CliCommand {
    Quit,
    Status,
    StepByStep(String), // Strict diagnostic run: /steps <question>
    Ask(String),
}

pub fn parse_input(line: &str) -> CliCommand {
    let trimmed = line.trim();

    // An empty line is a termination signal, same as the quit words.
    if trimmed.is_empty() {
        return CliCommand::Quit;
    }

    if trimmed == "/status" {
        return CliCommand::Status;
    }

    if trimmed == "/steps" {
        return CliCommand::StepByStep(String::new());
    }

    if let Some(rest) = trimmed.strip_prefix("/steps ") {
        return CliCommand::StepByStep(rest.trim().to_string());
    }

    if ["quit", "exit", "q"]
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        return CliCommand::Quit;
    }

    CliCommand::Ask(trimmed.to_string())
}
