//! Built-in category and domain tables.
//!
//! Both tables are declared once, in order, and never mutated. Exact lookups
//! go through a hash index; prefix and suffix scans walk the domain table in
//! declaration order, so earlier entries take precedence.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::color::GroupColor;
use crate::error::{CategorizeError, Result};

/// Name of the catch-all category.
pub const OTHERS: &str = "Others";

/// A category with its display color and matching keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub color: GroupColor,
    pub keywords: Vec<String>,
}

impl CategorySpec {
    pub fn new(name: impl Into<String>, color: GroupColor, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            color,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// Immutable category and domain tables.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<CategorySpec>,
    domains: Vec<(String, String)>,
    domain_index: HashMap<String, usize>,
    category_index: HashMap<String, usize>,
}

impl Taxonomy {
    /// Build a taxonomy from ordered tables.
    ///
    /// Every domain must map to a declared category. When a domain key is
    /// declared more than once, the first declaration wins.
    pub fn new(categories: Vec<CategorySpec>, domains: Vec<(String, String)>) -> Result<Self> {
        if let Some((_, category)) = domains
            .iter()
            .find(|(_, category)| !categories.iter().any(|spec| &spec.name == category))
        {
            return Err(CategorizeError::UnknownCategory(category.clone()));
        }
        Ok(Self::from_tables(categories, domains))
    }

    fn from_tables(categories: Vec<CategorySpec>, domains: Vec<(String, String)>) -> Self {
        let category_index = categories
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name.clone(), i))
            .collect();

        let mut domain_index = HashMap::with_capacity(domains.len());
        for (i, (domain, _)) in domains.iter().enumerate() {
            domain_index.entry(domain.clone()).or_insert(i);
        }

        Self {
            categories,
            domains,
            domain_index,
            category_index,
        }
    }

    /// The built-in tables: thirteen generic categories plus `Others`, and
    /// several hundred well-known domains.
    pub fn builtin() -> &'static Taxonomy {
        &BUILTIN
    }

    /// Categories in declaration order, `Others` included.
    pub fn categories(&self) -> &[CategorySpec] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategorySpec> {
        self.category_index
            .get(name)
            .map(|&i| &self.categories[i])
    }

    pub fn color_of(&self, name: &str) -> Option<GroupColor> {
        self.category(name).map(|spec| spec.color)
    }

    pub fn is_category(&self, name: &str) -> bool {
        self.category_index.contains_key(name)
    }

    /// Domain table in declaration order.
    pub fn domains(&self) -> impl Iterator<Item = (&str, &str)> {
        self.domains
            .iter()
            .map(|(domain, category)| (domain.as_str(), category.as_str()))
    }

    /// Exact domain-table lookup.
    pub fn lookup_domain(&self, domain: &str) -> Option<&str> {
        self.domain_index
            .get(domain)
            .map(|&i| self.domains[i].1.as_str())
    }
}

static BUILTIN: Lazy<Taxonomy> = Lazy::new(|| {
    let domains = BUILTIN_DOMAINS
        .iter()
        .map(|(domain, category)| ((*domain).to_string(), (*category).to_string()))
        .collect();
    Taxonomy::from_tables(builtin_categories(), domains)
});

fn builtin_categories() -> Vec<CategorySpec> {
    use GroupColor::*;

    vec![
        CategorySpec::new(
            "AI",
            Purple,
            &[
                "ai", "chatbot", "assistant", "prompt", "llm", "gpt", "claude", "gemini", "copilot",
                "artificial intelligence", "machine learning",
            ],
        ),
        CategorySpec::new(
            "Social Media",
            Blue,
            &["feed", "timeline", "followers", "post", "tweet", "like", "share", "profile", "social"],
        ),
        CategorySpec::new(
            "Entertainment",
            Red,
            &[
                "watch", "stream", "video", "movie", "music", "podcast", "episode", "play", "game",
                "gaming",
            ],
        ),
        CategorySpec::new(
            "Travel",
            Cyan,
            &[
                "flight", "hotel", "booking", "trip", "vacation", "travel", "destination", "tour",
                "reservation",
            ],
        ),
        CategorySpec::new(
            "Shopping",
            Yellow,
            &[
                "cart", "buy", "price", "product", "order", "shop", "checkout", "sale", "deal",
                "discount",
            ],
        ),
        CategorySpec::new(
            "Finance",
            Green,
            &[
                "bank", "payment", "balance", "transaction", "money", "invest", "stock", "crypto",
                "wallet",
            ],
        ),
        CategorySpec::new(
            "Development",
            Grey,
            &[
                "code", "repository", "pull request", "api", "developer", "programming", "debug",
                "git", "npm", "deploy",
            ],
        ),
        CategorySpec::new(
            "Documents",
            Orange,
            &[
                "document", "spreadsheet", "presentation", "docs", "sheet", "slides", "pdf", "file",
                "edit",
            ],
        ),
        CategorySpec::new(
            "Communication",
            Pink,
            &[
                "chat", "message", "meeting", "email", "inbox", "call", "video call", "conference",
                "slack", "teams",
            ],
        ),
        CategorySpec::new(
            "Learning",
            Cyan,
            &[
                "course", "lesson", "tutorial", "education", "learn", "training", "class", "lecture",
                "study",
            ],
        ),
        CategorySpec::new(
            "News",
            Grey,
            &[
                "news", "article", "breaking", "report", "headline", "latest", "update", "world",
                "politics",
            ],
        ),
        CategorySpec::new(
            "Reference",
            Blue,
            &[
                "wiki", "documentation", "guide", "reference", "manual", "api docs", "definition",
                "encyclopedia",
            ],
        ),
        CategorySpec::new(
            "Productivity",
            Green,
            &[
                "calendar", "todo", "task", "project", "plan", "schedule", "organize", "reminder",
                "deadline",
            ],
        ),
        CategorySpec::new(OTHERS, Grey, &[]),
    ]
}

#[rustfmt::skip]
const BUILTIN_DOMAINS: &[(&str, &str)] = &[
    // AI Tools
    ("chat.openai.com", "AI"),
    ("chatgpt.com", "AI"),
    ("manus.im", "AI"),
    ("openai.com", "AI"),
    ("claude.ai", "AI"),
    ("anthropic.com", "AI"),
    ("gemini.google.com", "AI"),
    ("bard.google.com", "AI"),
    ("perplexity.ai", "AI"),
    ("poe.com", "AI"),
    ("copilot.microsoft.com", "AI"),
    ("huggingface.co", "AI"),
    ("replicate.com", "AI"),
    ("midjourney.com", "AI"),
    ("stability.ai", "AI"),
    ("runway.ml", "AI"),
    ("character.ai", "AI"),
    ("inflection.ai", "AI"),
    ("pi.ai", "AI"),
    ("you.com", "AI"),
    ("phind.com", "AI"),
    ("deepl.com", "AI"),
    ("grammarly.com", "AI"),
    ("jasper.ai", "AI"),
    ("copy.ai", "AI"),
    ("writesonic.com", "AI"),
    ("notion.so/ai", "AI"),

    // Social Media
    ("facebook.com", "Social Media"),
    ("fb.com", "Social Media"),
    ("twitter.com", "Social Media"),
    ("x.com", "Social Media"),
    ("instagram.com", "Social Media"),
    ("linkedin.com", "Social Media"),
    ("reddit.com", "Social Media"),
    ("tiktok.com", "Social Media"),
    ("threads.net", "Social Media"),
    ("mastodon.social", "Social Media"),
    ("tumblr.com", "Social Media"),
    ("pinterest.com", "Social Media"),
    ("snapchat.com", "Social Media"),
    ("discord.com", "Social Media"),
    ("quora.com", "Social Media"),
    ("bluesky.app", "Social Media"),
    ("bsky.app", "Social Media"),

    // Entertainment
    ("youtube.com", "Entertainment"),
    ("youtu.be", "Entertainment"),
    ("netflix.com", "Entertainment"),
    ("spotify.com", "Entertainment"),
    ("open.spotify.com", "Entertainment"),
    ("twitch.tv", "Entertainment"),
    ("disneyplus.com", "Entertainment"),
    ("primevideo.com", "Entertainment"),
    ("hulu.com", "Entertainment"),
    ("hbomax.com", "Entertainment"),
    ("max.com", "Entertainment"),
    ("peacocktv.com", "Entertainment"),
    ("crunchyroll.com", "Entertainment"),
    ("funimation.com", "Entertainment"),
    ("soundcloud.com", "Entertainment"),
    ("vimeo.com", "Entertainment"),
    ("dailymotion.com", "Entertainment"),
    ("pandora.com", "Entertainment"),
    ("deezer.com", "Entertainment"),
    ("tidal.com", "Entertainment"),
    ("apple.com/music", "Entertainment"),
    ("music.apple.com", "Entertainment"),
    ("steam.com", "Entertainment"),
    ("steampowered.com", "Entertainment"),
    ("epicgames.com", "Entertainment"),
    ("xbox.com", "Entertainment"),
    ("playstation.com", "Entertainment"),
    ("ign.com", "Entertainment"),
    ("imdb.com", "Entertainment"),
    ("rottentomatoes.com", "Entertainment"),

    // Travel
    ("booking.com", "Travel"),
    ("airbnb.com", "Travel"),
    ("expedia.com", "Travel"),
    ("tripadvisor.com", "Travel"),
    ("kayak.com", "Travel"),
    ("skyscanner.com", "Travel"),
    ("hotels.com", "Travel"),
    ("agoda.com", "Travel"),
    ("vrbo.com", "Travel"),
    ("hostelworld.com", "Travel"),
    ("priceline.com", "Travel"),
    ("hotwire.com", "Travel"),
    ("orbitz.com", "Travel"),
    ("travelocity.com", "Travel"),
    ("cheapflights.com", "Travel"),
    ("google.com/maps", "Travel"),
    ("maps.google.com", "Travel"),
    ("google.com/travel", "Travel"),
    ("waze.com", "Travel"),
    ("uber.com", "Travel"),
    ("lyft.com", "Travel"),
    ("rome2rio.com", "Travel"),
    ("lonelyplanet.com", "Travel"),
    ("viator.com", "Travel"),
    ("getyourguide.com", "Travel"),
    ("delta.com", "Travel"),
    ("united.com", "Travel"),
    ("aa.com", "Travel"),
    ("southwest.com", "Travel"),
    ("jetblue.com", "Travel"),
    ("emirates.com", "Travel"),
    ("britishairways.com", "Travel"),
    ("airindia.com", "Travel"),
    ("makemytrip.com", "Travel"),
    ("goibibo.com", "Travel"),
    ("cleartrip.com", "Travel"),
    ("ixigo.com", "Travel"),
    ("yatra.com", "Travel"),

    // Shopping
    ("amazon.com", "Shopping"),
    ("amazon.in", "Shopping"),
    ("amazon.co.uk", "Shopping"),
    ("amazon.de", "Shopping"),
    ("ebay.com", "Shopping"),
    ("flipkart.com", "Shopping"),
    ("walmart.com", "Shopping"),
    ("target.com", "Shopping"),
    ("etsy.com", "Shopping"),
    ("alibaba.com", "Shopping"),
    ("aliexpress.com", "Shopping"),
    ("wish.com", "Shopping"),
    ("shopify.com", "Shopping"),
    ("bestbuy.com", "Shopping"),
    ("newegg.com", "Shopping"),
    ("costco.com", "Shopping"),
    ("homedepot.com", "Shopping"),
    ("lowes.com", "Shopping"),
    ("ikea.com", "Shopping"),
    ("wayfair.com", "Shopping"),
    ("overstock.com", "Shopping"),
    ("zappos.com", "Shopping"),
    ("asos.com", "Shopping"),
    ("shein.com", "Shopping"),
    ("zara.com", "Shopping"),
    ("hm.com", "Shopping"),
    ("uniqlo.com", "Shopping"),
    ("nike.com", "Shopping"),
    ("adidas.com", "Shopping"),
    ("myntra.com", "Shopping"),
    ("ajio.com", "Shopping"),
    ("nykaa.com", "Shopping"),
    ("meesho.com", "Shopping"),

    // Finance
    ("paypal.com", "Finance"),
    ("stripe.com", "Finance"),
    ("coinbase.com", "Finance"),
    ("robinhood.com", "Finance"),
    ("binance.com", "Finance"),
    ("kraken.com", "Finance"),
    ("razorpay.com", "Finance"),
    ("paytm.com", "Finance"),
    ("phonepe.com", "Finance"),
    ("gpay.app", "Finance"),
    ("venmo.com", "Finance"),
    ("cashapp.com", "Finance"),
    ("wise.com", "Finance"),
    ("revolut.com", "Finance"),
    ("chase.com", "Finance"),
    ("bankofamerica.com", "Finance"),
    ("wellsfargo.com", "Finance"),
    ("citi.com", "Finance"),
    ("capitalone.com", "Finance"),
    ("discover.com", "Finance"),
    ("americanexpress.com", "Finance"),
    ("fidelity.com", "Finance"),
    ("schwab.com", "Finance"),
    ("etrade.com", "Finance"),
    ("tdameritrade.com", "Finance"),
    ("vanguard.com", "Finance"),
    ("mint.com", "Finance"),
    ("ynab.com", "Finance"),
    ("personalcapital.com", "Finance"),
    ("nerdwallet.com", "Finance"),
    ("creditkarma.com", "Finance"),
    ("zerodha.com", "Finance"),
    ("groww.in", "Finance"),
    ("upstox.com", "Finance"),
    ("kite.zerodha.com", "Finance"),
    ("moneycontrol.com", "Finance"),
    ("tradingview.com", "Finance"),
    ("investing.com", "Finance"),
    ("yahoo.com/finance", "Finance"),
    ("finance.yahoo.com", "Finance"),

    // Development
    ("github.com", "Development"),
    ("gitlab.com", "Development"),
    ("bitbucket.org", "Development"),
    ("stackoverflow.com", "Development"),
    ("stackexchange.com", "Development"),
    ("npmjs.com", "Development"),
    ("pypi.org", "Development"),
    ("rubygems.org", "Development"),
    ("crates.io", "Development"),
    ("packagist.org", "Development"),
    ("nuget.org", "Development"),
    ("maven.apache.org", "Development"),
    ("vercel.com", "Development"),
    ("netlify.com", "Development"),
    ("heroku.com", "Development"),
    ("render.com", "Development"),
    ("railway.app", "Development"),
    ("fly.io", "Development"),
    ("digitalocean.com", "Development"),
    ("aws.amazon.com", "Development"),
    ("console.aws.amazon.com", "Development"),
    ("cloud.google.com", "Development"),
    ("console.cloud.google.com", "Development"),
    ("azure.microsoft.com", "Development"),
    ("portal.azure.com", "Development"),
    ("firebase.google.com", "Development"),
    ("supabase.com", "Development"),
    ("planetscale.com", "Development"),
    ("mongodb.com", "Development"),
    ("redis.com", "Development"),
    ("docker.com", "Development"),
    ("hub.docker.com", "Development"),
    ("kubernetes.io", "Development"),
    ("terraform.io", "Development"),
    ("localhost", "Development"),
    ("127.0.0.1", "Development"),
    ("codepen.io", "Development"),
    ("codesandbox.io", "Development"),
    ("replit.com", "Development"),
    ("jsfiddle.net", "Development"),
    ("glitch.com", "Development"),
    // Listed once: here for partial-match order, filed under Reference
    ("devdocs.io", "Reference"),
    ("regex101.com", "Development"),
    ("jsonformatter.org", "Development"),
    ("jwt.io", "Development"),

    // Documents
    ("docs.google.com", "Documents"),
    ("sheets.google.com", "Documents"),
    ("slides.google.com", "Documents"),
    ("drive.google.com", "Documents"),
    ("notion.so", "Documents"),
    ("coda.io", "Documents"),
    ("airtable.com", "Documents"),
    ("dropbox.com", "Documents"),
    ("box.com", "Documents"),
    ("onedrive.live.com", "Documents"),
    ("sharepoint.com", "Documents"),
    ("office.com", "Documents"),
    ("office365.com", "Documents"),
    ("evernote.com", "Documents"),
    ("onenote.com", "Documents"),
    ("confluence.atlassian.com", "Documents"),
    ("paper.dropbox.com", "Documents"),
    ("quip.com", "Documents"),
    ("zoho.com/docs", "Documents"),
    ("canva.com", "Documents"),
    ("figma.com", "Documents"),
    ("miro.com", "Documents"),
    ("lucidchart.com", "Documents"),
    ("diagrams.net", "Documents"),
    ("draw.io", "Documents"),
    ("overleaf.com", "Documents"),
    ("typst.app", "Documents"),

    // Communication
    ("mail.google.com", "Communication"),
    ("gmail.com", "Communication"),
    ("outlook.live.com", "Communication"),
    ("outlook.office.com", "Communication"),
    ("outlook.com", "Communication"),
    ("mail.yahoo.com", "Communication"),
    ("protonmail.com", "Communication"),
    ("proton.me", "Communication"),
    ("tutanota.com", "Communication"),
    ("fastmail.com", "Communication"),
    ("slack.com", "Communication"),
    ("app.slack.com", "Communication"),
    ("teams.microsoft.com", "Communication"),
    ("zoom.us", "Communication"),
    ("meet.google.com", "Communication"),
    ("whereby.com", "Communication"),
    ("webex.com", "Communication"),
    ("gotomeeting.com", "Communication"),
    ("whatsapp.com", "Communication"),
    ("web.whatsapp.com", "Communication"),
    ("telegram.org", "Communication"),
    ("web.telegram.org", "Communication"),
    ("signal.org", "Communication"),
    ("messenger.com", "Communication"),
    ("intercom.com", "Communication"),
    ("crisp.chat", "Communication"),
    ("zendesk.com", "Communication"),
    ("freshdesk.com", "Communication"),
    ("helpscout.com", "Communication"),

    // Learning
    ("coursera.org", "Learning"),
    ("udemy.com", "Learning"),
    ("edx.org", "Learning"),
    ("khanacademy.org", "Learning"),
    ("skillshare.com", "Learning"),
    ("pluralsight.com", "Learning"),
    ("linkedin.com/learning", "Learning"),
    ("lynda.com", "Learning"),
    ("codecademy.com", "Learning"),
    ("freecodecamp.org", "Learning"),
    ("leetcode.com", "Learning"),
    ("hackerrank.com", "Learning"),
    ("codewars.com", "Learning"),
    ("exercism.org", "Learning"),
    ("brilliant.org", "Learning"),
    ("masterclass.com", "Learning"),
    ("duolingo.com", "Learning"),
    ("memrise.com", "Learning"),
    ("babbel.com", "Learning"),
    ("busuu.com", "Learning"),
    ("udacity.com", "Learning"),
    ("datacamp.com", "Learning"),
    ("treehouse.com", "Learning"),
    ("frontendmasters.com", "Learning"),
    ("egghead.io", "Learning"),
    ("laracasts.com", "Learning"),
    ("mit.edu", "Learning"),
    ("stanford.edu", "Learning"),
    ("harvard.edu", "Learning"),
    ("berkeley.edu", "Learning"),
    ("classroom.google.com", "Learning"),

    // News
    ("news.google.com", "News"),
    ("cnn.com", "News"),
    ("bbc.com", "News"),
    ("bbc.co.uk", "News"),
    ("nytimes.com", "News"),
    ("theguardian.com", "News"),
    ("reuters.com", "News"),
    ("apnews.com", "News"),
    ("wsj.com", "News"),
    ("washingtonpost.com", "News"),
    ("forbes.com", "News"),
    ("bloomberg.com", "News"),
    ("cnbc.com", "News"),
    ("foxnews.com", "News"),
    ("nbcnews.com", "News"),
    ("abcnews.go.com", "News"),
    ("cbsnews.com", "News"),
    ("usatoday.com", "News"),
    ("huffpost.com", "News"),
    ("vice.com", "News"),
    ("vox.com", "News"),
    ("buzzfeed.com", "News"),
    ("theatlantic.com", "News"),
    ("economist.com", "News"),
    ("time.com", "News"),
    ("newsweek.com", "News"),
    ("techcrunch.com", "News"),
    ("theverge.com", "News"),
    ("wired.com", "News"),
    ("arstechnica.com", "News"),
    ("engadget.com", "News"),
    ("gizmodo.com", "News"),
    ("mashable.com", "News"),
    ("cnet.com", "News"),
    ("zdnet.com", "News"),
    ("venturebeat.com", "News"),
    ("thenextweb.com", "News"),
    ("hindustantimes.com", "News"),
    ("timesofindia.indiatimes.com", "News"),
    ("ndtv.com", "News"),
    ("indianexpress.com", "News"),
    ("thehindu.com", "News"),

    // Reference
    ("wikipedia.org", "Reference"),
    ("en.wikipedia.org", "Reference"),
    ("developer.mozilla.org", "Reference"),
    ("mdn.io", "Reference"),
    ("w3schools.com", "Reference"),
    ("docs.python.org", "Reference"),
    ("docs.rust-lang.org", "Reference"),
    ("go.dev", "Reference"),
    ("typescriptlang.org", "Reference"),
    ("reactjs.org", "Reference"),
    ("react.dev", "Reference"),
    ("vuejs.org", "Reference"),
    ("angular.io", "Reference"),
    ("svelte.dev", "Reference"),
    ("nextjs.org", "Reference"),
    ("nodejs.org", "Reference"),
    ("expressjs.com", "Reference"),
    ("fastify.io", "Reference"),
    ("django-project.com", "Reference"),
    ("flask.palletsprojects.com", "Reference"),
    ("rubyonrails.org", "Reference"),
    ("laravel.com", "Reference"),
    ("spring.io", "Reference"),
    ("dart.dev", "Reference"),
    ("flutter.dev", "Reference"),
    ("kotlinlang.org", "Reference"),
    ("swift.org", "Reference"),
    ("cppreference.com", "Reference"),
    ("docs.microsoft.com", "Reference"),
    ("learn.microsoft.com", "Reference"),
    ("cloud.google.com/docs", "Reference"),
    ("docs.aws.amazon.com", "Reference"),
    ("merriam-webster.com", "Reference"),
    ("dictionary.com", "Reference"),
    ("thesaurus.com", "Reference"),
    ("britannica.com", "Reference"),
    ("wolframalpha.com", "Reference"),
    ("mathworld.wolfram.com", "Reference"),
    ("arxiv.org", "Reference"),
    ("scholar.google.com", "Reference"),
    ("pubmed.ncbi.nlm.nih.gov", "Reference"),
    ("researchgate.net", "Reference"),
    ("semanticscholar.org", "Reference"),

    // Productivity
    ("calendar.google.com", "Productivity"),
    ("trello.com", "Productivity"),
    ("asana.com", "Productivity"),
    ("todoist.com", "Productivity"),
    ("monday.com", "Productivity"),
    ("clickup.com", "Productivity"),
    ("basecamp.com", "Productivity"),
    ("linear.app", "Productivity"),
    ("height.app", "Productivity"),
    ("shortcut.com", "Productivity"),
    ("jira.atlassian.com", "Productivity"),
    ("youtrack.jetbrains.com", "Productivity"),
    ("wrike.com", "Productivity"),
    ("smartsheet.com", "Productivity"),
    ("teamwork.com", "Productivity"),
    ("clockify.me", "Productivity"),
    ("toggl.com", "Productivity"),
    ("harvest.com", "Productivity"),
    ("zapier.com", "Productivity"),
    ("ifttt.com", "Productivity"),
    ("make.com", "Productivity"),
    ("n8n.io", "Productivity"),
    ("calendly.com", "Productivity"),
    ("doodle.com", "Productivity"),
    ("when2meet.com", "Productivity"),
    ("1password.com", "Productivity"),
    ("lastpass.com", "Productivity"),
    ("bitwarden.com", "Productivity"),
    ("dashlane.com", "Productivity"),
    ("buffer.com", "Productivity"),
    ("hootsuite.com", "Productivity"),
    ("later.com", "Productivity"),
    ("loom.com", "Productivity"),
    ("screencastify.com", "Productivity"),
];
