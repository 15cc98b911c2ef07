use crate::app::{AppContext, Result};
use crate::domain::{Author, CommentId, Email, Slug, Username};
use crate::feed::FeedSource;
use crate::session::Session;

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let email = Email::parse(email)?;
    let user = ctx.api.login(&email, password).await?;
    ctx.storage.store(&user)?;
    println!("Signed in as {}", user.username());
    Ok(())
}

pub async fn register(
    ctx: &AppContext,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let username = Username::parse(username)?;
    let email = Email::parse(email)?;
    let user = ctx.api.register(&username, &email, password).await?;
    ctx.storage.store(&user)?;
    println!("Welcome, {}", user.username());
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.storage.logout()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(session: &Session) -> Result<()> {
    match session.user() {
        Some(user) => println!("{} <{}>", user.username(), user.email()),
        None => println!("Not signed in"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn feed(
    ctx: &AppContext,
    session: &Session,
    mine: bool,
    tag: Option<String>,
    author: Option<String>,
    favorited: Option<String>,
    page: u64,
) -> Result<()> {
    let source = if mine {
        FeedSource::YourFeed
    } else if let Some(tag) = tag {
        FeedSource::TagFeed(tag)
    } else if let Some(author) = author {
        FeedSource::AuthorFeed(Username::parse(&author)?)
    } else if let Some(favorited) = favorited {
        FeedSource::FavoritedFeed(Username::parse(&favorited)?)
    } else {
        FeedSource::GlobalFeed
    };

    let (page, feed) = ctx.api.feed(&source, page, session.credential()).await?;

    if feed.articles().is_empty() {
        println!("No articles");
        return Ok(());
    }

    println!("{}", source.label());
    for article in feed.articles() {
        let meta = article.metadata();
        let marker = if meta.favorited { "★" } else { " " };
        let date = meta
            .created_at
            .with_timezone(&session.time_zone())
            .format("%Y-%m-%d");
        println!(
            "{} {:>3} {} {} — {} ({})",
            marker,
            meta.favorites_count,
            date,
            article.slug(),
            meta.title,
            article.author().username()
        );
    }

    if feed.show_page_links(source.page_size()) {
        println!("Page {} of {}", page, feed.total_pages(source.page_size()));
    }

    Ok(())
}

pub async fn article(ctx: &AppContext, session: &Session, slug: &str) -> Result<()> {
    let slug = Slug::parse(slug)?;
    let article = ctx.api.article(&slug, session.credential()).await?;

    let meta = article.metadata();
    let date = meta
        .created_at
        .with_timezone(&session.time_zone())
        .format("%Y-%m-%d %H:%M");
    println!("# {}", meta.title);
    println!("by {} on {}", article.author().username(), date);
    if !meta.tags.is_empty() {
        println!("tags: {}", meta.tags.join(", "));
    }
    println!();
    println!("{}", article.body().as_markdown());
    Ok(())
}

pub async fn favorite(ctx: &AppContext, session: &Session, slug: &str) -> Result<()> {
    let credential = session.attempt("favorite this article", |c| c.clone())?;
    let slug = Slug::parse(slug)?;

    let article = ctx.api.article(&slug, Some(&credential)).await?;
    let updated = ctx.api.toggle_favorite(&article, &credential).await?;

    let meta = updated.metadata();
    if meta.favorited {
        println!("Favorited {} ({} favorites)", slug, meta.favorites_count);
    } else {
        println!("Unfavorited {} ({} favorites)", slug, meta.favorites_count);
    }
    Ok(())
}

pub async fn follow(ctx: &AppContext, session: &Session, username: &str) -> Result<()> {
    let credential = session.attempt("follow", |c| c.clone())?;
    let username = Username::parse(username)?;

    match ctx.api.profile(&username, Some(&credential)).await? {
        Author::NotFollowing(author) => {
            let result = ctx.api.follow(&author, &credential).await?;
            report_follow_state(&result);
        }
        Author::Following(author) => {
            println!("Already following {}", author.username());
        }
        Author::IsSelf(profile) => {
            println!("{} is you; there is nothing to follow", profile.username());
        }
    }
    Ok(())
}

pub async fn unfollow(ctx: &AppContext, session: &Session, username: &str) -> Result<()> {
    let credential = session.attempt("unfollow", |c| c.clone())?;
    let username = Username::parse(username)?;

    match ctx.api.profile(&username, Some(&credential)).await? {
        Author::Following(author) => {
            let result = ctx.api.unfollow(&author, &credential).await?;
            report_follow_state(&result);
        }
        Author::NotFollowing(author) => {
            println!("Not following {}", author.username());
        }
        Author::IsSelf(profile) => {
            println!("{} is you; there is nothing to unfollow", profile.username());
        }
    }
    Ok(())
}

fn report_follow_state(author: &Author) {
    match author {
        Author::Following(author) => println!("Now following {}", author.username()),
        Author::NotFollowing(author) => println!("No longer following {}", author.username()),
        Author::IsSelf(profile) => println!("{} is you", profile.username()),
    }
}

pub async fn comments(ctx: &AppContext, session: &Session, slug: &str) -> Result<()> {
    let slug = Slug::parse(slug)?;
    let comments = ctx.api.comments(&slug, session.credential()).await?;

    if comments.is_empty() {
        println!("No comments");
        return Ok(());
    }

    for comment in comments {
        let date = comment
            .created_at()
            .with_timezone(&session.time_zone())
            .format("%Y-%m-%d");
        println!(
            "[{}] {} on {}: {}",
            comment.id(),
            comment.author().username(),
            date,
            comment.body()
        );
    }
    Ok(())
}

pub async fn comment(ctx: &AppContext, session: &Session, slug: &str, body: &str) -> Result<()> {
    let credential = session.attempt("comment", |c| c.clone())?;
    let slug = Slug::parse(slug)?;
    let posted = ctx.api.post_comment(&slug, body, &credential).await?;
    println!("Posted comment {}", posted.id());
    Ok(())
}

pub async fn uncomment(ctx: &AppContext, session: &Session, slug: &str, id: i64) -> Result<()> {
    let credential = session.attempt("delete this comment", |c| c.clone())?;
    let slug = Slug::parse(slug)?;
    let deleted = ctx.api.delete_comment(&slug, CommentId::new(id), &credential).await?;
    println!("Deleted comment {}", deleted);
    Ok(())
}
