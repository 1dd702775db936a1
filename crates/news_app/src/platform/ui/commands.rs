use news_core::Msg;

pub const HELP: &str = "\
Commands:
  add <company>      track a company
  remove <company>   stop tracking a company
  range <days>       select the time range
  domain <value>     toggle a domain filter (e.g. yahoo.com)
  source <name>      toggle a source filter on the current page
  search             fetch page 1 for the current query
  page <n>           go to page n
  next | prev        move one page forward or back
  export             write every matching article to a spreadsheet
  show               redraw the current view
  help               show this text
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Update(Msg),
    Show,
    Help,
    Quit,
}

/// Parses one line of user input. Blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => Command::Update(Msg::CompanyAdded(required(rest, "add")?)),
        "remove" | "rm" => Command::Update(Msg::CompanyRemoved(required(rest, "remove")?)),
        "range" => Command::Update(Msg::TimeRangeSelected(number(rest, "range")?)),
        "domain" => Command::Update(Msg::DomainToggled(required(rest, "domain")?)),
        "source" => Command::Update(Msg::SourceToggled(required(rest, "source")?)),
        "search" => Command::Update(Msg::SearchClicked),
        "page" => Command::Update(Msg::PageRequested(number(rest, "page")?)),
        "next" => Command::Update(Msg::NextPageClicked),
        "prev" => Command::Update(Msg::PrevPageClicked),
        "export" => Command::Update(Msg::ExportClicked),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

fn required(rest: &str, verb: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("'{verb}' needs an argument"))
    } else {
        Ok(rest.to_string())
    }
}

fn number(rest: &str, verb: &str) -> Result<u32, String> {
    rest.parse()
        .map_err(|_| format!("'{verb}' needs a whole number, got '{rest}'"))
}
