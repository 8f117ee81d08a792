use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Speech-Harvest
///
/// Every section is optional; missing sections and keys fall back to the
/// built-in defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered list of targets to scrape
    #[serde(alias = "presidents")]
    pub roster: Vec<Target>,

    /// Job retry, pacing and logging behavior
    pub scraping: ScrapingConfig,

    /// Phase toggles, state and job script layout
    pub execution: ExecutionConfig,

    /// Remote archive layout used by the phase commands
    pub site: SiteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            scraping: ScrapingConfig::default(),
            execution: ExecutionConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

impl Config {
    /// Looks up a roster target by identifier
    pub fn target(&self, id: &str) -> Option<&Target> {
        self.roster.iter().find(|t| t.id == id)
    }
}

/// One scrapeable entity
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RosterEntry")]
pub struct Target {
    /// Stable identifier, used in file and job names
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Value sent to the remote site for the target parameter
    pub query: String,
}

impl Target {
    /// Creates a target whose display name and query value derive from the id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.replace('_', " "),
            query: id.clone(),
            id,
        }
    }

    /// Sets the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the remote query value
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }
}

/// Roster entries are either a bare identifier or a full object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RosterEntry {
    Id(String),
    Full {
        id: String,
        name: Option<String>,
        query: Option<String>,
    },
}

impl From<RosterEntry> for Target {
    fn from(entry: RosterEntry) -> Self {
        match entry {
            RosterEntry::Id(id) => Target::new(id),
            RosterEntry::Full { id, name, query } => {
                let mut target = Target::new(id);
                if let Some(name) = name {
                    target.name = name;
                }
                if let Some(query) = query {
                    target.query = query;
                }
                target
            }
        }
    }
}

/// Job retry, pacing and logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Whether failed jobs are retried at all
    #[serde(alias = "retryOnFailure")]
    pub retry_on_failure: bool,

    /// Maximum number of retries after the first attempt
    #[serde(alias = "maxRetries")]
    pub max_retries: u32,

    /// Pause after each executed job (seconds)
    #[serde(alias = "delayBetweenScripts")]
    pub delay_between_scripts: u64,

    /// Pause before retrying a failed job (seconds)
    #[serde(alias = "retryBackoffSecs")]
    pub retry_backoff_secs: u64,

    /// Wall-clock bound for one job attempt (seconds)
    #[serde(alias = "jobTimeoutSecs")]
    pub job_timeout_secs: u64,

    /// Mirror log output to `log_file`
    #[serde(alias = "saveLogs")]
    pub save_logs: bool,

    /// Log file path
    #[serde(alias = "logFile")]
    pub log_file: PathBuf,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            retry_on_failure: true,
            max_retries: 3,
            delay_between_scripts: 2,
            retry_backoff_secs: 2,
            job_timeout_secs: 600,
            save_logs: true,
            log_file: PathBuf::from("scraping_log.txt"),
        }
    }
}

impl ScrapingConfig {
    /// Retry budget actually applied to a failing job
    pub fn effective_max_retries(&self) -> u32 {
        if self.retry_on_failure {
            self.max_retries
        } else {
            0
        }
    }
}

/// Phase toggles, state file and job script layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Run the link collection phase
    #[serde(alias = "run_scrap1", alias = "runPhase1")]
    pub run_phase1: bool,

    /// Run the content extraction phase
    #[serde(alias = "run_scrap2", alias = "runPhase2")]
    pub run_phase2: bool,

    /// Load and persist the completed-jobs state
    #[serde(alias = "resumeCapability")]
    pub resume_capability: bool,

    /// Path of the completed-jobs state file
    #[serde(alias = "stateFile")]
    pub state_file: PathBuf,

    /// Directory holding the job scripts; also their working directory
    #[serde(alias = "scriptDir")]
    pub script_dir: PathBuf,

    /// File extension of job scripts (without the dot)
    #[serde(alias = "scriptExtension")]
    pub script_extension: String,

    /// Program used to run a job script; empty runs the script directly
    pub interpreter: String,

    /// Directory receiving run summary files
    #[serde(alias = "summaryDir")]
    pub summary_dir: PathBuf,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            run_phase1: true,
            run_phase2: true,
            resume_capability: true,
            state_file: PathBuf::from(".scraping_state.json"),
            script_dir: PathBuf::from("."),
            script_extension: "py".to_string(),
            interpreter: "python3".to_string(),
            summary_dir: PathBuf::from("."),
        }
    }
}

/// Remote archive layout and scrape pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Listing endpoint; content links are resolved against it
    #[serde(alias = "baseUrl")]
    pub base_url: String,

    /// Form field carrying the page number
    #[serde(alias = "pageParam")]
    pub page_param: String,

    /// Form and query field carrying the target
    #[serde(alias = "targetParam")]
    pub target_param: String,

    /// Safety ceiling on listing pages
    #[serde(alias = "maxPages")]
    pub max_pages: u32,

    /// Selector for one listing row
    #[serde(alias = "rowSelector")]
    pub row_selector: String,

    /// Selector for the link inside a listing row
    #[serde(alias = "linkSelector")]
    pub link_selector: String,

    /// Selector for the body region of a content page
    #[serde(alias = "contentSelector")]
    pub content_selector: String,

    /// Selector for label/value rows of a content page
    #[serde(alias = "metaRowSelector")]
    pub meta_row_selector: String,

    /// Label identifying the date row
    #[serde(alias = "dateLabel")]
    pub date_label: String,

    /// Persist the collection every time its size reaches a multiple of this
    #[serde(alias = "checkpointInterval")]
    pub checkpoint_interval: usize,

    /// Per-request timeout (seconds)
    #[serde(alias = "requestTimeoutSecs")]
    pub request_timeout_secs: u64,

    /// Pause after each content fetch (milliseconds)
    #[serde(alias = "requestDelayMs")]
    pub request_delay_ms: u64,

    /// Directory receiving link and text collections
    #[serde(alias = "outputDir")]
    pub output_dir: PathBuf,

    /// Link collection file name; `{target}` is replaced by the target id
    #[serde(alias = "linksFile")]
    pub links_file: String,

    /// Text collection file name; `{target}` is replaced by the target id
    #[serde(alias = "textsFile")]
    pub texts_file: String,

    /// User-Agent header sent with every request
    #[serde(alias = "userAgent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.pa.go.kr/online_contents/archive/president_speechIndex.jsp"
                .to_string(),
            page_param: "pageIndex".to_string(),
            target_param: "activePresident".to_string(),
            max_pages: 200,
            row_selector: "table.board-list tbody tr".to_string(),
            link_selector: "td.subject a".to_string(),
            content_selector: "td.content".to_string(),
            meta_row_selector: "table.board-view tbody tr".to_string(),
            date_label: "연설일자".to_string(),
            checkpoint_interval: 20,
            request_timeout_secs: 10,
            request_delay_ms: 1000,
            output_dir: PathBuf::from("."),
            links_file: "president_links_{target}.json".to_string(),
            texts_file: "president_texts_{target}.json".to_string(),
            user_agent: concat!("speech-harvest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SiteConfig {
    /// Path of the link collection for a target
    pub fn links_path(&self, target: &Target) -> PathBuf {
        self.output_dir
            .join(self.links_file.replace("{target}", &target.id))
    }

    /// Path of the text collection for a target
    pub fn texts_path(&self, target: &Target) -> PathBuf {
        self.output_dir
            .join(self.texts_file.replace("{target}", &target.id))
    }
}

fn default_roster() -> Vec<Target> {
    [
        ("Lee_Seung_Man", "이승만"),
        ("Yun_Bo_Seon", "윤보선"),
        ("Park_Chung_Hee", "박정희"),
        ("Chun_Doo_Hwan", "전두환"),
        ("Roh_Tae_Woo", "노태우"),
        ("Kim_Young_Sam", "김영삼"),
        ("Kim_Dae_Jung", "김대중"),
        ("Lee_Myung_Bak", "이명박"),
        ("Park_Geun_Hye", "박근혜"),
        ("Moon_Jae_In", "문재인"),
    ]
    .into_iter()
    .map(|(id, query)| Target::new(id).with_query(query))
    .collect()
}
