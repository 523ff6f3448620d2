//! Line-oriented interactive menu.

use serde_json::Value;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use userdesk_core::server::AppContext;
use userdesk_core::types::{Arguments, ToolDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Query,
    Tools,
    Resources,
    Prompts,
    Roots,
    Exit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "query" | "q" => Some(Command::Query),
            "2" | "tools" => Some(Command::Tools),
            "3" | "resources" => Some(Command::Resources),
            "4" | "prompts" => Some(Command::Prompts),
            "5" | "roots" => Some(Command::Roots),
            "6" | "exit" | "quit" => Some(Command::Exit),
            _ => None,
        }
    }
}

/// `{name}` placeholders in a resource URI template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + 1 + len];
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &rest[start + 2 + len..];
    }
    names
}

pub fn fill(template: &str, values: &[(String, String)]) -> String {
    values.iter().fold(template.to_string(), |uri, (name, value)| {
        uri.replace(&format!("{{{name}}}"), value)
    })
}

/// JSON is pretty-printed; anything else is shown as-is.
pub fn render(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.to_string())
}

struct Menu<'a, R> {
    context: &'a AppContext,
    input: Lines<R>,
}

pub async fn run(context: &AppContext) -> io::Result<()> {
    let stdin: BufReader<Stdin> = BufReader::new(tokio::io::stdin());
    let mut menu = Menu {
        context,
        input: stdin.lines(),
    };
    menu.banner();
    menu.run().await
}

impl<R: AsyncBufRead + Unpin> Menu<'_, R> {
    fn banner(&self) {
        println!("Connected to the user-record server.");
        println!(
            "  {} tools, {} resources, {} prompts",
            self.context.tools().len(),
            self.context.resources().len(),
            self.context.prompts().len()
        );
        self.print_roots();
    }

    async fn run(&mut self) -> io::Result<()> {
        loop {
            println!();
            println!("1) query  2) tools  3) resources  4) prompts  5) roots  6) exit");
            let Some(choice) = self.ask("> ").await? else {
                return Ok(());
            };
            match Command::parse(&choice) {
                Some(Command::Query) => self.query().await?,
                Some(Command::Tools) => self.tools().await?,
                Some(Command::Resources) => self.resources().await?,
                Some(Command::Prompts) => self.prompts().await?,
                Some(Command::Roots) => self.print_roots(),
                Some(Command::Exit) => return Ok(()),
                None => println!("Unknown choice: {}", choice.trim()),
            }
        }
    }

    /// `None` once stdin is closed.
    async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        self.input.next_line().await
    }

    async fn pick(&mut self, count: usize) -> io::Result<Option<usize>> {
        if count == 0 {
            println!("Nothing available.");
            return Ok(None);
        }
        let Some(answer) = self.ask("Number: ").await? else {
            return Ok(None);
        };
        match answer.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Ok(Some(n - 1)),
            _ => {
                println!("Expected a number between 1 and {count}.");
                Ok(None)
            }
        }
    }

    async fn query(&mut self) -> io::Result<()> {
        let Some(text) = self.ask("Query: ").await? else {
            return Ok(());
        };
        if text.trim().is_empty() {
            return Ok(());
        }
        self.answer(text).await;
        Ok(())
    }

    async fn answer(&self, text: String) {
        match self.context.agent().run(text).await {
            Ok(outcome) => {
                for call in &outcome.tool_calls {
                    let mark = if call.success { "ok" } else { "failed" };
                    println!("  [{mark}] {} -> {}", call.tool, call.result);
                }
                println!("{}", outcome.outcome.text());
            }
            Err(err) => println!("Error: {}", err.user_message()),
        }
    }

    async fn tools(&mut self) -> io::Result<()> {
        let tools = self.context.tools().to_vec();
        for (i, tool) in tools.iter().enumerate() {
            println!("{}. {} - {}", i + 1, tool.name, tool.description.as_deref().unwrap_or(""));
        }
        let Some(index) = self.pick(tools.len()).await? else {
            return Ok(());
        };
        let tool = &tools[index];
        let Some(args) = self.collect_tool_arguments(tool).await? else {
            return Ok(());
        };
        match self.context.executor().execute(&tool.name, args).await {
            Ok(result) => println!("{result}"),
            Err(err) => println!("Error: {}", err.user_message()),
        }
        Ok(())
    }

    async fn collect_tool_arguments(&mut self, tool: &ToolDescriptor) -> io::Result<Option<Arguments>> {
        let mut args = Arguments::new();
        for property in tool.property_names() {
            let Some(value) = self.ask(&format!("{property}: ")).await? else {
                return Ok(None);
            };
            let value = value.trim();
            if !value.is_empty() {
                args.insert(property, Value::String(value.to_string()));
            }
        }
        Ok(Some(args))
    }

    async fn resources(&mut self) -> io::Result<()> {
        let resources = self.context.resources().to_vec();
        for (i, resource) in resources.iter().enumerate() {
            println!("{}. {} ({})", i + 1, resource.name, resource.uri);
        }
        let Some(index) = self.pick(resources.len()).await? else {
            return Ok(());
        };
        let template = &resources[index].uri;
        let mut values = Vec::new();
        for name in placeholders(template) {
            let Some(value) = self.ask(&format!("{name}: ")).await? else {
                return Ok(());
            };
            values.push((name, value.trim().to_string()));
        }
        let uri = fill(template, &values);
        match self.context.session().read_resource(&uri).await {
            Ok(result) => match result.first_text() {
                Some(text) => println!("{}", render(text)),
                None => println!("(no text content)"),
            },
            Err(err) => println!("Error: {err}"),
        }
        Ok(())
    }

    async fn prompts(&mut self) -> io::Result<()> {
        let prompts = self.context.prompts().to_vec();
        for (i, prompt) in prompts.iter().enumerate() {
            println!("{}. {} - {}", i + 1, prompt.name, prompt.description.as_deref().unwrap_or(""));
        }
        let Some(index) = self.pick(prompts.len()).await? else {
            return Ok(());
        };
        let prompt = &prompts[index];
        let mut args = Arguments::new();
        for argument in &prompt.arguments {
            let Some(value) = self.ask(&format!("{}: ", argument.name)).await? else {
                return Ok(());
            };
            args.insert(argument.name.clone(), Value::String(value.trim().to_string()));
        }

        let result = match self.context.session().get_prompt(&prompt.name, args).await {
            Ok(result) => result,
            Err(err) => {
                println!("Error: {err}");
                return Ok(());
            }
        };
        let text = result
            .messages
            .iter()
            .filter_map(|message| message.content.as_text())
            .collect::<Vec<_>>()
            .join("\n");
        println!("{text}");

        let Some(answer) = self.ask("Send to the model? [y/N] ").await? else {
            return Ok(());
        };
        if answer.trim().eq_ignore_ascii_case("y") && !text.is_empty() {
            self.answer(text).await;
        }
        Ok(())
    }

    fn print_roots(&self) {
        for root in self.context.roots() {
            println!("  root: {} ({})", root.uri, root.name.as_deref().unwrap_or("unnamed"));
        }
    }
}
