use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, anyhow, bail};
use todoapp_core::config::Config;
use todoapp_core::host::{Navigator, Notifier, TaskView};
use todoapp_core::transport::HttpTransport;
use todoapp_core::{
    ActionOutcome, Filter, Gateway, LoginController, LoginOutcome, Reply, Session, TaskController,
    TaskStore,
};
use todoapp_shared::{TaskDto, TaskId};
use tracing::{debug, info};

use crate::cli::Command;
use crate::render::Renderer;
use crate::storage::FileStorage;
use crate::transport::ReqwestTransport;

/// Terminal stand-in for the page: prompts and notices go to stderr,
/// navigation becomes a hint about what to run next.
#[derive(Debug, Clone)]
pub struct TerminalHost {
    login_path: String,
}

impl TerminalHost {
    pub fn new(cfg: &Config) -> Self {
        Self {
            login_path: cfg.login_path.clone(),
        }
    }
}

impl Navigator for TerminalHost {
    fn navigate(&self, path: &str) {
        debug!(path, "navigate");
        if path == self.login_path {
            eprintln!("Signed out. Run `todo login <username>` to sign in.");
        }
    }
}

impl Notifier for TerminalHost {
    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn notice(&self, message: &str) {
        eprintln!("{message}");
    }
}

impl TaskView for TerminalHost {
    fn render(&self, _store: &TaskStore) {}
}

pub fn session_file(cfg: &Config) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cfg.session_file {
        return Ok(path.clone());
    }
    let base = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("could not determine a data directory; set session_file"))?;
    Ok(base.join("todoapp").join("session.json"))
}

pub struct Client {
    cfg: Config,
    session: Session,
    transport: Rc<dyn HttpTransport>,
    host: Rc<TerminalHost>,
    renderer: Renderer,
}

impl Client {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let session_path = session_file(&cfg)?;
        debug!(session = %session_path.display(), "using session file");

        let transport = ReqwestTransport::new(&cfg)?;
        Ok(Self::with_parts(
            cfg,
            Session::new(Rc::new(FileStorage::new(session_path))),
            Rc::new(transport),
            Renderer::new(),
        ))
    }

    pub fn with_parts(
        cfg: Config,
        session: Session,
        transport: Rc<dyn HttpTransport>,
        renderer: Renderer,
    ) -> Self {
        let host = Rc::new(TerminalHost::new(&cfg));
        Self {
            cfg,
            session,
            transport,
            host,
            renderer,
        }
    }

    fn controller(&self) -> TaskController {
        let gateway = Gateway::from_config(
            &self.cfg,
            self.session.clone(),
            self.transport.clone(),
            self.host.clone(),
        );
        TaskController::new(gateway, self.host.clone(), self.host.clone())
    }

    #[tracing::instrument(skip_all)]
    pub async fn dispatch<W: Write>(&self, command: Command, mut out: W) -> anyhow::Result<()> {
        if !matches!(command, Command::Logout) && self.cfg.api_base.trim().is_empty() {
            bail!(
                "api_base is not configured; pass --rc api_base=http://host:port \
                 or set it in the config file"
            );
        }

        match command {
            Command::Login { username, password } => {
                let password = match password {
                    Some(password) => password,
                    None => read_password()?,
                };
                self.login(&username, &password, &mut out).await
            }
            Command::Logout => {
                self.controller().logout();
                Ok(())
            }
            Command::List { filter } => self.list(filter, &mut out).await,
            Command::Show { id } => self.show(&id, &mut out).await,
            Command::Add { title } => {
                let controller = self.controller();
                expect_done(controller.add(&title.join(" ")).await)?;
                if let Some(node) = controller.store().nodes().last() {
                    writeln!(out, "created task {}", node.id)?;
                }
                Ok(())
            }
            Command::Toggle { id } => {
                let controller = self.loaded(&id).await?;
                expect_done(controller.toggle(&id).await)?;
                let state = controller
                    .store()
                    .get(&id)
                    .map(|node| node.state.is_complete());
                if let Some(completed) = state {
                    let label = if completed { "completed" } else { "incomplete" };
                    writeln!(out, "task {id} is now {label}")?;
                }
                Ok(())
            }
            Command::Delete { id } => {
                let controller = self.loaded(&id).await?;
                expect_done(controller.delete(&id).await)?;
                controller.finish_removal(&id);
                writeln!(out, "deleted task {id}")?;
                Ok(())
            }
            Command::Clear => {
                let controller = self.controller();
                expect_done(controller.load().await)?;
                let report = controller.clear_all().await;
                if report.interrupted {
                    bail!("session expired while clearing");
                }
                self.renderer.print_clear_report(&mut out, report)
            }
        }
    }

    async fn login<W: Write>(&self, username: &str, password: &str, mut out: W) -> anyhow::Result<()> {
        let login = LoginController::new(
            &self.cfg,
            self.session.clone(),
            self.transport.clone(),
            self.host.clone(),
        );
        match login.submit(username, password).await {
            LoginOutcome::LoggedIn => {
                info!(username = username.trim(), "logged in");
                writeln!(out, "logged in as {}", username.trim())?;
                Ok(())
            }
            outcome => Err(anyhow!(
                outcome.message().unwrap_or("login failed").to_string()
            )),
        }
    }

    async fn list<W: Write>(&self, filter: Filter, mut out: W) -> anyhow::Result<()> {
        let controller = self.controller();
        expect_done(controller.load().await)?;
        controller.filter(filter);
        let store = controller.store();
        self.renderer
            .print_task_table(&mut out, store.nodes(), store.counters())
    }

    async fn show<W: Write>(&self, id: &TaskId, mut out: W) -> anyhow::Result<()> {
        let controller = self.controller();
        match controller.gateway().get_task(id).await {
            Reply::Success(response) => {
                let task: TaskDto = response.json().context("malformed task in response")?;
                self.renderer.print_task_info(&mut out, &task)
            }
            Reply::ServerError { status, body } => {
                debug!(%status, body = %body, "show failed");
                bail!("could not fetch task {id} (server returned {status})")
            }
            Reply::TransportError(err) => {
                Err(anyhow::Error::new(err).context("could not reach the server"))
            }
            Reply::SessionExpired => bail!("session expired"),
        }
    }

    /// Controller holding the server's current list, with `id` present.
    async fn loaded(&self, id: &TaskId) -> anyhow::Result<TaskController> {
        let controller = self.controller();
        expect_done(controller.load().await)?;
        if controller.store().get(id).is_none() {
            bail!("no task with id {id}");
        }
        Ok(controller)
    }
}

fn expect_done(outcome: ActionOutcome) -> anyhow::Result<()> {
    match outcome {
        ActionOutcome::Done => Ok(()),
        ActionOutcome::Rejected => bail!("nothing to do"),
        ActionOutcome::Busy => bail!("task is busy"),
        ActionOutcome::Missing => bail!("no such task"),
        ActionOutcome::Failed => bail!("request failed"),
        ActionOutcome::SessionExpired => bail!("session expired"),
    }
}

fn read_password() -> anyhow::Result<String> {
    eprint!("password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed reading password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
