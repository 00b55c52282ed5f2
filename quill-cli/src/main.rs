use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use quill_client::{
    CreateCategoryRequest, CreatePostRequest, ListPostsParams, Post, QuillClient,
    UpdatePostRequest,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Server base URL, defaults to QUILL_SERVER or http://localhost:5000
    #[arg(short, long)]
    server: Option<String>,

    #[arg(long)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Remove the saved token
    Logout,

    /// Show the saved token state
    Status,

    /// Show the profile behind the saved token
    Whoami,

    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        #[arg(long)]
        status: Option<String>,
    },

    Get {
        id: String,
    },

    Update {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    Delete {
        id: String,
    },

    Like {
        id: String,
    },

    List {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: i64,

        /// "newest" or "oldest"
        #[arg(long)]
        sort: Option<String>,
    },

    /// List categories, or create one with --name (admin only)
    Categories {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    Health,
}

struct TokenManager {
    token_path: PathBuf,
}

impl TokenManager {
    fn new(custom_path: Option<PathBuf>) -> Result<Self> {
        let token_path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(".quill_token")
            }
        };

        Ok(Self { token_path })
    }

    fn save_token(&self, token: &str) -> Result<()> {
        fs::write(&self.token_path, token)
            .with_context(|| format!("Failed to save token to {:?}", self.token_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.token_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.token_path, perms)?;
        }

        println!("Token saved to {:?}", self.token_path);
        Ok(())
    }

    fn load_token(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if !token.is_empty() {
                    Ok(Some(token))
                } else {
                    Ok(None)
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read token file"),
        }
    }

    fn clear_token(&self) -> Result<()> {
        if self.token_path.exists() {
            fs::remove_file(&self.token_path)
                .with_context(|| format!("Failed to remove token file {:?}", self.token_path))?;
            println!("Token file removed");
        }
        Ok(())
    }
}

fn fail(message: String) -> ! {
    eprintln!("{} {}", "error:".red().bold(), message);
    std::process::exit(1);
}

fn print_post(post: &Post) {
    let author = post
        .author
        .as_ref()
        .map(|a| a.username.clone())
        .unwrap_or_else(|| "<deleted>".to_string());
    let category = post
        .category
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "-".to_string());

    println!("   ID: {}", post.id);
    println!("   Title: {}", post.title);
    println!("   Slug: {}", post.slug);
    println!("   Author: {}", author);
    println!("   Category: {}", category);
    println!("   Status: {}", post.status);
    println!("   Views: {}  Likes: {}", post.views, post.likes);
    if !post.tags.is_empty() {
        println!("   Tags: {}", post.tags.join(", "));
    }
    println!("   Created: {}", post.created_at);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let base_url = cli
        .server
        .or_else(|| std::env::var("QUILL_SERVER").ok())
        .unwrap_or_else(|| "http://localhost:5000".to_string());

    let client = QuillClient::new(&base_url);

    let token_manager = TokenManager::new(cli.token_file)?;
    if let Some(token) = token_manager.load_token()? {
        client.set_token(token).await;
    }

    match &cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            println!("Registering user: {}", username);

            match client.register(username, email, password).await {
                Ok(response) => {
                    println!("{}", "Registration successful".green());
                    println!("   User ID: {}", response.user.id);
                    println!("   Username: {}", response.user.username);
                    println!("   Email: {}", response.user.email);

                    token_manager.save_token(&response.token)?;
                }
                Err(e) => fail(format!("registration failed: {}", e)),
            }
        }

        Commands::Login { email, password } => {
            println!("Logging in as: {}", email);

            match client.login(email, password).await {
                Ok(response) => {
                    println!("{}", "Login successful".green());
                    println!("   User ID: {}", response.user.id);
                    println!("   Username: {}", response.user.username);
                    println!("   Role: {}", response.user.role);

                    token_manager.save_token(&response.token)?;
                }
                Err(e) => fail(format!("login failed: {}", e)),
            }
        }

        Commands::Logout => {
            token_manager.clear_token()?;
            println!("Logged out");
        }

        Commands::Status => match token_manager.load_token()? {
            Some(token) => {
                let preview: String = token.chars().take(20).collect();
                println!("Token file: {:?}", token_manager.token_path);
                println!("   Token: {}...", preview);
                println!("   Length: {} characters", token.len());
                println!("   Status: {}", "active".green());
            }
            None => {
                println!("No token found");
                println!("   Login first: quill-cli login --email <email> --password <password>");
            }
        },

        Commands::Whoami => match client.me().await {
            Ok(response) => {
                println!("   ID: {}", response.user.id);
                println!("   Username: {}", response.user.username);
                println!("   Email: {}", response.user.email);
                println!("   Role: {}", response.user.role);
            }
            Err(e) => {
                if e.is_unauthorized() {
                    fail("not logged in, or the saved token expired".to_string());
                }
                fail(e.to_string());
            }
        },

        Commands::Create {
            title,
            content,
            category,
            tags,
            status,
        } => {
            let req = CreatePostRequest {
                title: title.clone(),
                content: content.clone(),
                category: category.clone(),
                tags: tags.clone(),
                status: status.clone(),
            };

            match client.create_post(req).await {
                Ok(response) => {
                    println!("{}", "Post created".green());
                    print_post(&response.data);
                }
                Err(e) => {
                    if e.is_unauthorized() {
                        fail("unauthorized, login first".to_string());
                    }
                    fail(format!("failed to create post: {}", e));
                }
            }
        }

        Commands::Get { id } => match client.get_post(id).await {
            Ok(response) => {
                print_post(&response.data);
                println!("   Content: {}", response.data.content);
            }
            Err(e) => {
                if e.is_not_found() {
                    fail(format!("post {} not found", id));
                }
                fail(e.to_string());
            }
        },

        Commands::Update {
            id,
            title,
            content,
            status,
        } => {
            let req = UpdatePostRequest {
                title: title.clone(),
                content: content.clone(),
                status: status.clone(),
                ..Default::default()
            };

            match client.update_post(id, req).await {
                Ok(response) => {
                    println!("{}", "Post updated".green());
                    print_post(&response.data);
                }
                Err(e) => {
                    if e.is_forbidden() {
                        fail("you do not own this post".to_string());
                    }
                    fail(format!("failed to update post: {}", e));
                }
            }
        }

        Commands::Delete { id } => match client.delete_post(id).await {
            Ok(_) => println!("{}", "Post deleted".green()),
            Err(e) => {
                if e.is_forbidden() {
                    fail("you do not own this post".to_string());
                }
                fail(format!("failed to delete post: {}", e));
            }
        },

        Commands::Like { id } => match client.like_post(id).await {
            Ok(response) => println!("Likes: {}", response.likes),
            Err(e) => fail(format!("failed to like post: {}", e)),
        },

        Commands::List {
            category,
            status,
            author,
            page,
            limit,
            sort,
        } => {
            let params = ListPostsParams {
                category: category.clone(),
                status: status.clone(),
                author: author.clone(),
                page: Some(*page),
                limit: Some(*limit),
                sort: sort.clone(),
            };

            match client.list_posts(&params).await {
                Ok(response) => {
                    println!(
                        "Found {} posts (total: {}, page {}/{})",
                        response.count, response.total, response.page, response.pages
                    );
                    println!();

                    if response.data.is_empty() {
                        println!("   No posts found");
                    } else {
                        for (i, post) in response.data.iter().enumerate() {
                            println!("   {}. [{}] {}", i + 1, post.id, post.title);
                            println!("      Status: {}  Views: {}", post.status, post.views);
                            println!("      Content: {}", truncate(&post.content, 50));
                            println!();
                        }
                    }
                }
                Err(e) => fail(format!("failed to list posts: {}", e)),
            }
        }

        Commands::Categories {
            name,
            description,
            color,
        } => match name {
            Some(name) => {
                let req = CreateCategoryRequest {
                    name: name.clone(),
                    description: description.clone(),
                    color: color.clone(),
                };
                match client.create_category(req).await {
                    Ok(response) => {
                        println!("{}", "Category created".green());
                        println!("   ID: {}", response.data.id);
                        println!("   Name: {}", response.data.name);
                        println!("   Slug: {}", response.data.slug);
                    }
                    Err(e) => {
                        if e.is_forbidden() {
                            fail("only admins can create categories".to_string());
                        }
                        fail(format!("failed to create category: {}", e));
                    }
                }
            }
            None => match client.list_categories().await {
                Ok(response) => {
                    println!("Found {} categories", response.count);
                    for category in &response.data {
                        println!("   [{}] {} ({})", category.id, category.name, category.slug);
                    }
                }
                Err(e) => fail(format!("failed to list categories: {}", e)),
            },
        },

        Commands::Health => match client.health().await {
            Ok(response) => {
                println!("{}: {}", "ok".green(), response.message);
                println!("   Timestamp: {}", response.timestamp);
            }
            Err(e) => fail(format!("server unreachable: {}", e)),
        },
    }

    Ok(())
}
