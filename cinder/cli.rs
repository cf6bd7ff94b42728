// Copyright (C) 2025-2026 The Cinder Developers.
// This file is part of the cinder library.

// The cinder library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The cinder library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the cinder library. If not, see <https://www.gnu.org/licenses/>.

use clap::{App, AppSettings, Arg};

/// Returns the command-line interface of the node.
///
/// Every flag overrides the corresponding field of the configuration file.
pub fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("cinder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A proof-of-work value-transfer chain node")
        .setting(AppSettings::ColoredHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .help("Specify the path of the config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ip")
                .long("ip")
                .help("Specify the ip of your node")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("port")
                .long("port")
                .short("p")
                .help("Specify the port the node is run on")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("bootstrap")
                .long("bootstrap")
                .help("Specify the ip:port of the bootstrap directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("difficulty")
                .long("difficulty")
                .help("Specify the number of leading zeros a block hash must carry")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("max-peers")
                .long("max-peers")
                .help("Specify the maximum number of peers this node registers")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("path")
                .long("path")
                .short("d")
                .help("Specify the node's storage path")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("is-bootstrap")
                .long("is-bootstrap")
                .help("Run the node as the bootstrap directory"),
        )
        .arg(
            Arg::with_name("no-mine")
                .long("no-mine")
                .help("Disable the mining loop of the node"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .multiple(true)
                .help("Increase the verbosity of the logs"),
        )
}
